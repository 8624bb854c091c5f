pub mod groupings;

pub mod results;

pub mod submissions;

pub use groupings::configure_groupings_routes;
pub use results::configure_results_routes;
pub use submissions::configure_submissions_routes;
