pub mod doctor;
pub mod office;

pub use doctor::DoctorService;
pub use office::MedicalOfficeService;
