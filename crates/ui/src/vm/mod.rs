mod exam_vm;
mod result_vm;
mod time_fmt;

pub use exam_vm::{
    ExamIntent, ExamVm, NavigatorCellVm, OptionVm, QuestionVm, SubjectOptionVm,
    map_subject_options, selection_label,
};
pub use result_vm::{
    ExamResultCardVm, ReportVm, SubjectRowVm, map_result_cards, result_meta_label,
};
pub use time_fmt::{format_datetime, format_elapsed};
