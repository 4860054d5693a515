pub mod codec;
pub mod decode;
pub mod respond;
pub mod token;
pub mod validation;
