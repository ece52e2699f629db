pub mod errors;
pub mod factory;
pub mod planner;

pub use errors::AppError;
pub use factory::AppFactory;
pub use planner::ItineraryPlanner;
