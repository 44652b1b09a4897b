mod appointment;
mod reminder;
mod status;

pub mod dtos {
    pub use crate::appointment::dtos::*;
    pub use crate::reminder::dtos::*;
}

pub use crate::appointment::api::*;
pub use crate::reminder::api::*;
pub use crate::status::api::*;
