//! Whether the assembler is inside a `<pattern><` ... `<pattern>>` code block.

/// Code blocks do not nest. An open marker inside a block, or a close marker outside
/// one, is refused and the caller treats the line as ordinary content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlockState {
    #[default]
    Outside,
    /// Inside a block opened on the given 1-based line.
    Inside { opened_at: usize },
}

impl BlockState {
    /// Enters a block. Returns `false` and stays put when already inside.
    pub fn open(&mut self, line: usize) -> bool {
        match self {
            BlockState::Outside => {
                *self = BlockState::Inside { opened_at: line };
                true
            }
            BlockState::Inside { .. } => false,
        }
    }

    /// Leaves a block. Returns `false` and stays put when already outside.
    pub fn close(&mut self) -> bool {
        match self {
            BlockState::Inside { .. } => {
                *self = BlockState::Outside;
                true
            }
            BlockState::Outside => false,
        }
    }

    pub fn is_inside(&self) -> bool {
        matches!(self, BlockState::Inside { .. })
    }
}
