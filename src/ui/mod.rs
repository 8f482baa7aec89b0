pub mod multi_select;
pub mod panels;
pub mod table;
