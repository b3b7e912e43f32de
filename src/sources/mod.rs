pub mod alphaquery;
pub mod layout;
pub mod wikipedia;
pub mod yahoo;
