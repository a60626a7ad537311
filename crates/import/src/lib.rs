pub mod builder;
pub mod detect;
pub mod scan;
pub mod sheet;
pub mod workbook;

pub use builder::RowIter;
pub use detect::{detect_columns, ColumnMap};
pub use scan::{read_account_info, scan_for_bank_info, ACCOUNT_INFO_SHEET};
pub use sheet::{Cell, MemSheet, Worksheet};
pub use workbook::{
    load_workbook, process_sheets, process_workbook, process_workbook_path, ImportError, SheetData,
};
