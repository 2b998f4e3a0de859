pub mod mock_checker;
pub mod mock_ocr;

use proofbot::core::{CorrectorOptions, TrailingFragment};
use proofbot::processor::Processor;
use std::sync::Arc;
use std::time::Duration;

pub use mock_checker::MockChecker;
pub use mock_ocr::MockOcr;

/// Options with a short timeout so hanging checkers fail fast
pub fn test_options(trailing: TrailingFragment) -> CorrectorOptions {
    CorrectorOptions {
        timeout: Duration::from_millis(200),
        trailing,
    }
}

/// Processor wired to the given mocks
pub fn processor(checker: &Arc<MockChecker>, ocr: &Arc<MockOcr>) -> Processor {
    Processor::new(
        checker.clone(),
        ocr.clone(),
        test_options(TrailingFragment::Keep),
    )
}
