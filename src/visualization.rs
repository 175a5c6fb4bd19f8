pub mod frame;
pub mod canvas;
pub mod plotters_canvas;
pub mod one_var_one_obj;
