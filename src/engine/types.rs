/// Constants that depend on the *frame-buffer*, not on the scene.
#[derive(Clone, Copy)]
pub struct Screen {
    pub w: usize,
    pub h: usize,
}

impl Screen {
    pub fn new(w: usize, h: usize) -> Self {
        Self { w, h }
    }
}
