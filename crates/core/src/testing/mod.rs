//! Testing utilities and mock implementations.
//!
//! Mock collaborators for exercising the fetch protocol without live
//! network access: a scripted transport and a recording captcha solver.

mod mock_captcha;
mod mock_transport;

pub use mock_captcha::MockCaptchaSolver;
pub use mock_transport::MockTransport;
