#![allow(dead_code)]

pub mod builders;
pub mod requests;
pub mod stubs;

pub use builders::FormBuilder;
pub use requests::{body_string, get, multipart_upload, send, test_app};
pub use stubs::{AgeTimesThousand, CountingModel, FailingModel, FixedModel};
