pub mod campaign;
pub mod flyer;
pub mod scan;
