mod address_selection;
mod address_unit;
mod district;
mod province;
mod sub_district;

pub use address_selection::{AddressSelection, SelectionStage};
pub use address_unit::AddressUnit;
pub use district::District;
pub use province::Province;
pub use sub_district::SubDistrict;
