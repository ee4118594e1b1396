pub mod prompt;
pub mod vision;

pub use prompt::FISH_PROMPT;
pub use vision::{
    build_vision_client, GeminiVision, OpenAiVision, VisionOptions, VisionProvider,
    GENERIC_FAILURE_MESSAGE,
};
