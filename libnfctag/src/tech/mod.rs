// libnfctag/src/tech/mod.rs
//! Technology interpretation: raw RF parameters in, technology records out.

pub mod interpreter;
pub mod kovio;
pub mod params;
pub mod record;

pub use interpreter::{
    TechnologyInterpreter, fwt_from_fwi, iso_dep_timeout, merge_combi_sak, t1t_max_message_size,
};
pub use kovio::KovioDedupState;
pub use params::{
    ActivationParams, KovioParams, NfcAParams, NfcBParams, NfcFParams, NfcVParams, RfTechParams,
    TechParams,
};
pub use record::TechnologyRecord;
