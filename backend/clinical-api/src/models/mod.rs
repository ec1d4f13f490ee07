pub mod appointment;
pub mod doctor;
pub mod image;
pub mod patient;
pub mod report;
pub mod study;
pub mod user;

pub use appointment::{Appointment, AppointmentCreate};
pub use doctor::{Doctor, DoctorCreate, DoctorOut, DoctorSchedule, DoctorUpdate, ScheduleItem};
pub use image::ImageRecord;
pub use patient::{Patient, PatientCreate, PatientUpdate};
pub use report::{Report, ReportCreate, ReportStatus, ReportUpdate};
pub use study::{Study, StudyCreate, StudyUpdate};
pub use user::{
    ChangePasswordRequest, LoginRequest, RegisterRequest, RequestSetPasswordRequest,
    SetPasswordRequest, TokenResponse, UpdateMeRequest, User, UserOut, ValidateTokenResponse,
};
