pub mod dialogs;
pub mod side_panel;
pub mod theme;
pub mod timeline_view;
pub mod toolbar;
