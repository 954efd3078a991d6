pub mod attendance;
pub mod class;
pub mod feedback;
pub mod notification;
pub mod student;

pub use attendance::{
    date_key, fold_marks, AttendanceChange, AttendanceRecord, BulkAttendanceRequest,
    StudentMarks, TuitionChange, TUITION_DATE_KEY,
};
pub use class::{Class, ClassView, NewClassRequest, UpdateClassRequest};
pub use feedback::{
    FeedbackForm, FeedbackResponse, NewFeedbackFormRequest, NewFeedbackResponseRequest,
};
pub use notification::Notification;
pub use student::{EnrollRequest, NewStudentRequest, Student};
