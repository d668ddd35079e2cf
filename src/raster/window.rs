/// A rectangular pixel region of a raster.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Window {
    pub col_off: usize,
    pub row_off: usize,
    pub width: usize,
    pub height: usize,
}

impl Window {
    pub fn new(col_off: usize, row_off: usize, width: usize, height: usize) -> Self {
        Window {
            col_off,
            row_off,
            width,
            height,
        }
    }

    pub fn offset(&self) -> (isize, isize) {
        (self.col_off as isize, self.row_off as isize)
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> usize {
        self.width * self.height
    }
}

/// Iterates over the blocks of a raster in row-major order, yielding the
/// `(row, col)` block index and its window. Edge blocks are clipped to the
/// raster extent.
#[derive(Debug, Clone)]
pub struct BlockWindows {
    raster_size: (usize, usize),
    block_size: (usize, usize),
    blocks: (usize, usize),
    next: usize,
}

impl BlockWindows {
    pub fn new(raster_size: (usize, usize), block_size: (usize, usize)) -> Self {
        let block_size = (block_size.0.max(1), block_size.1.max(1));
        let blocks = (
            raster_size.0.div_ceil(block_size.0),
            raster_size.1.div_ceil(block_size.1),
        );
        BlockWindows {
            raster_size,
            block_size,
            blocks,
            next: 0,
        }
    }

    fn total(&self) -> usize {
        self.blocks.0 * self.blocks.1
    }
}

impl Iterator for BlockWindows {
    type Item = ((usize, usize), Window);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.total() {
            return None;
        }
        let row = self.next / self.blocks.0;
        let col = self.next % self.blocks.0;
        self.next += 1;

        let col_off = col * self.block_size.0;
        let row_off = row * self.block_size.1;
        let width = self.block_size.0.min(self.raster_size.0 - col_off);
        let height = self.block_size.1.min(self.raster_size.1 - row_off);
        Some(((row, col), Window::new(col_off, row_off, width, height)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BlockWindows {}
