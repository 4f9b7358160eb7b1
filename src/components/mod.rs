pub mod network_editor;
pub mod results;
pub mod sim_form;
