use cgmath::{Matrix4, SquareMatrix};

/// Model-view matrix stack.
///
/// The top of the stack is held separately from the saved entries, so
/// `depth()` counts pushes that have not been popped yet.
#[derive(Debug, Clone)]
pub struct TransformStack {
    current: Matrix4<f32>,
    saved: Vec<Matrix4<f32>>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    pub fn new() -> Self {
        Self {
            current: Matrix4::identity(),
            saved: Vec::with_capacity(8),
        }
    }

    /// Replaces the top matrix.
    pub fn load(&mut self, matrix: Matrix4<f32>) {
        self.current = matrix;
    }

    /// Saves a copy of the top matrix.
    pub fn push(&mut self) {
        self.saved.push(self.current);
    }

    /// Right-multiplies the top matrix: `top = top * matrix`.
    pub fn multiply(&mut self, matrix: Matrix4<f32>) {
        self.current = self.current * matrix;
    }

    /// Restores the top matrix saved by the matching `push`.
    ///
    /// # Panics
    ///
    /// Panics when there is no matching `push`.
    pub fn pop(&mut self) {
        match self.saved.pop() {
            Some(matrix) => self.current = matrix,
            None => panic!("TransformStack::pop called without a matching push"),
        }
    }

    pub fn current(&self) -> Matrix4<f32> {
        self.current
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Runs `f` between a push and its pop, so the stack is left as found.
    pub fn scoped<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let depth = self.depth();
        self.push();
        let result = f(self);
        self.pop();
        debug_assert_eq!(depth, self.depth(), "unbalanced push/pop inside scope");
        result
    }
}
