use crate::presenter::Content;

pub trait Surface {
    /// Removes everything currently attached.
    fn clear(&mut self);
    /// Appends content after whatever is attached.
    fn attach(&mut self, content: Content);
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn clear(&mut self) {
        (**self).clear();
    }

    fn attach(&mut self, content: Content) {
        (**self).attach(content);
    }
}

#[derive(Debug, Default)]
pub struct MemorySurface {
    attached: Vec<Content>,
    clears: usize,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attached(&self) -> &[Content] {
        &self.attached
    }

    pub fn rendered(&self) -> String {
        self.attached
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn clear_count(&self) -> usize {
        self.clears
    }
}

impl Surface for MemorySurface {
    fn clear(&mut self) {
        self.attached.clear();
        self.clears += 1;
    }

    fn attach(&mut self, content: Content) {
        self.attached.push(content);
    }
}
