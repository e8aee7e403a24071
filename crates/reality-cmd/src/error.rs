use thiserror::Error;

pub type Result<T> = std::result::Result<T, CommandBufferError>;

/// Recoverable failures of the command ring.
///
/// Contract violations (writing more or fewer words than reserved, binding an
/// unresolved fragment program) are not represented here; they panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandBufferError {
    #[error("reservation of {words} words can never fit (at most {max} words per reservation)")]
    ReservationTooLarge { words: usize, max: usize },

    #[error("command processor made no room after {polls} GET polls")]
    Stalled { polls: u32 },

    #[error("invalid ring configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Failures while preparing or uploading shader programs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    #[error("vertex program has {0} instruction words (expected a multiple of 4)")]
    RaggedInstructions(usize),

    #[error("microcode blob length {0} is not a multiple of 4 bytes")]
    UnalignedBlob(usize),

    #[error("fragment program needs {required} words of storage but {available} were supplied")]
    StorageTooSmall { required: usize, available: usize },

    #[error("fragment program storage at 0x{addr:x} is not mapped into GPU IO space")]
    Unmapped { addr: usize },

    #[error(transparent)]
    CommandBuffer(#[from] CommandBufferError),
}
