pub mod attachment;
pub mod client;
pub mod resource;
pub mod validation;

pub use attachment::Attachment;
pub use client::ApiClient;
pub use resource::Resource;
