mod datagrid_lifecycle;
mod paging;
mod resolution;
