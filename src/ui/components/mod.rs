pub mod dialog;
pub mod entity_table;
pub mod forms;
pub mod measurement_table;
pub mod pages;

pub const BUTTON_STYLE: &str =
    "padding: 4px 10px; border: 1px solid #bbb; border-radius: 4px; background: #fff; cursor: pointer;";
pub const DANGER_BUTTON_STYLE: &str =
    "padding: 4px 10px; border: 1px solid #d33; border-radius: 4px; background: #fff; color: #d33; cursor: pointer;";
pub const PRIMARY_BUTTON_STYLE: &str =
    "padding: 4px 10px; border: 1px solid #2563eb; border-radius: 4px; background: #2563eb; color: #fff; cursor: pointer;";
pub const INPUT_STYLE: &str = "padding: 4px 6px; border: 1px solid #bbb; border-radius: 4px;";
pub const TABLE_STYLE: &str = "border-collapse: collapse; width: 100%; border: 1px solid #bbb;";
pub const TH_STYLE: &str = "border: 1px solid #bbb; padding: 6px; background: #f2f2f2; text-align: left;";
pub const TD_STYLE: &str = "border: 1px solid #bbb; padding: 6px;";
