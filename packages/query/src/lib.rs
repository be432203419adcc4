#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filtering and presentation projections over a loaded dataset.
//!
//! [`filter::apply`] turns a [`Dataset`](violence_map_dataset::Dataset) and a
//! [`FilterSpec`](violence_map_query_models::FilterSpec) into a
//! [`FilteredView`]. Everything else in this crate is a pure function of a
//! view: map markers and timeline events ([`projection`]), map framing and
//! layer groups, and per-year animation frames ([`animation`]).
//!
//! No function here mutates the dataset, so any number of requests can
//! query the same shared dataset concurrently.

pub mod animation;
pub mod filter;
pub mod projection;

pub use animation::{animation_frame, animation_frames, animation_years};
pub use filter::{FilteredView, apply, default_filter};
pub use projection::{frame_map, layer_groups, to_map_points, to_timeline_events};

#[cfg(test)]
pub(crate) mod fixtures {
    use violence_map_dataset::Dataset;
    use violence_map_source::columns::ColumnMapping;

    /// Six rows; the fifth has an unrecoverable latitude, so ids are
    /// 0, 1, 2, 3 and 5.
    pub const CSV: &str = "\
Latitude,Longitude,Ano,Mês,Dia,Vítima_Nome Civil_(Apelido/Nome Social),Descrição,Tipo_ação_vítima,Vítima_Gênero/Sexo,Vítimas_Etnia,Vítimas_Afiliação_1/Grupo,Cidade,Disputa,Instrumento_1
\"-10,5\",\"-50,5\",2015,6,15,Maria,Emboscada na estrada,Assassinato,Feminino,Parda,MST,Marabá,Terra,Arma de fogo
-12,-52,2010,SI,SI,João,,Ameaça de assassinato,Masculino,Indígena,,Altamira,Terra,
-8,-48,2023,2,30,,,Tentativa de assassinato,Feminino,,CPT,Belém,,Faca
-9,-49,2015,1,3,Ana,,Assassinato,Feminino,Indígena,,Marabá,Água,
99999999,-50,2012,1,1,Carlos,,Assassinato,Masculino,Parda,,Marabá,Terra,
-11,-51,2000,5,5,Pedro,,Despejo,Masculino,Parda,,Xinguara,,
";

    pub fn dataset() -> Dataset {
        Dataset::from_reader(CSV.as_bytes(), &ColumnMapping::default()).unwrap()
    }
}
