use crate::raster::{GdalType, Window};

/// A 2-D array backed by its `size` (cols, rows) and a row-major `Vec<T>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer<T> {
    pub size: (usize, usize),
    pub data: Vec<T>,
}

impl<T: GdalType> Buffer<T> {
    /// Construct a new buffer from `size` (`(cols, rows)`) and `Vec<T>`.
    ///
    /// # Panic
    /// Will panic if `size.0 * size.1 != data.len()`.
    pub fn new(size: (usize, usize), data: Vec<T>) -> Self {
        assert_eq!(
            size.0 * size.1,
            data.len(),
            "size {:?} does not match length {}",
            size,
            data.len()
        );
        Buffer { size, data }
    }

    /// A buffer of `size` filled with `value`.
    pub fn filled(size: (usize, usize), value: T) -> Self {
        Buffer {
            size,
            data: vec![value; size.0 * size.1],
        }
    }

    pub fn width(&self) -> usize {
        self.size.0
    }

    pub fn height(&self) -> usize {
        self.size.1
    }

    /// Copies `block` into this buffer with its top-left corner at the
    /// window's offset.
    ///
    /// # Panic
    /// Will panic if the window does not fit in the buffer or does not match
    /// the block's size.
    pub fn paste(&mut self, window: &Window, block: &Buffer<T>) {
        assert_eq!(
            (window.width, window.height),
            block.size,
            "window {window:?} does not match block size {:?}",
            block.size
        );
        assert!(
            window.col_off + window.width <= self.size.0
                && window.row_off + window.height <= self.size.1,
            "window {window:?} exceeds buffer size {:?}",
            self.size
        );
        for (row, src) in block.data.chunks_exact(block.size.0.max(1)).enumerate() {
            let start = (window.row_off + row) * self.size.0 + window.col_off;
            self.data[start..start + window.width].copy_from_slice(src);
        }
    }
}

pub type ByteBuffer = Buffer<u8>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic]
    fn size_mismatch_panics() {
        Buffer::new((3, 3), vec![0u8; 8]);
    }

    #[test]
    fn paste_block() {
        let mut canvas = ByteBuffer::filled((4, 3), 0);
        let block = ByteBuffer::new((2, 2), vec![1, 2, 3, 4]);
        canvas.paste(&Window::new(1, 1, 2, 2), &block);
        assert_eq!(
            canvas.data,
            vec![
                0, 0, 0, 0, //
                0, 1, 2, 0, //
                0, 3, 4, 0,
            ]
        );
    }

    #[test]
    #[should_panic]
    fn paste_out_of_bounds_panics() {
        let mut canvas = ByteBuffer::filled((4, 3), 0);
        let block = ByteBuffer::filled((2, 2), 1);
        canvas.paste(&Window::new(3, 2, 2, 2), &block);
    }
}
