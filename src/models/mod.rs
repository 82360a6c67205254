pub mod inspectionmodel;
pub mod propertymodel;
pub mod usermodel;
