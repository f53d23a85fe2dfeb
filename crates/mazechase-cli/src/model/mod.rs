pub use self::controller_model::ControllerModel;

mod controller_model;
