pub mod inspectiondtos;
pub mod propertydtos;
