pub mod error;
pub mod session;
pub mod traits;
pub mod types;

pub use error::{ErrorKind, FinscopeError};
pub use session::{AnalysisSource, AnalysisTicket, SessionError, SessionState};
pub use traits::VisionClient;
pub use types::EncodedImage;
