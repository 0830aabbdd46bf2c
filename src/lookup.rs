//! Enumeration tables: numeric codes to display names.
//!
//! Several record fields carry small integer codes (game mode, location, vehicle,
//! tyre state, ...) whose names live in the game's `ids.json`. A code missing from
//! its table resolves to [`UNKNOWN`]; new game content routinely appears before
//! the local tables are updated, so a miss is never an error.
//!
//! ```rust
//! use codriver::lookup::{Domain, EnumerationTables, UNKNOWN};
//! use codriver::documents::IdsDocument;
//!
//! let ids = IdsDocument::from_json(r#"{ "routes": [ { "id": 12, "name": "Sweet Lamb" } ] }"#)?;
//! let tables = EnumerationTables::from_document(&ids);
//!
//! assert_eq!(tables.describe(Domain::Route, 12), "Sweet Lamb");
//! assert_eq!(tables.describe(Domain::Route, 13), UNKNOWN);
//! # Ok::<(), codriver::TelemetryError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

use crate::documents::{DataVersion, IdsDocument, NamedEntry};
use crate::record::Record;

/// Label returned for any code without a name.
pub const UNKNOWN: &str = "Unknown";

/// An enumerated domain and the record field that carries its code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum Domain {
    GameMode,
    Location,
    Route,
    Vehicle,
    VehicleClass,
    VehicleManufacturer,
    TyreState,
    StageResultStatus,
}

impl Domain {
    pub const ALL: [Domain; 8] = [
        Domain::GameMode,
        Domain::Location,
        Domain::Route,
        Domain::Vehicle,
        Domain::VehicleClass,
        Domain::VehicleManufacturer,
        Domain::TyreState,
        Domain::StageResultStatus,
    ];

    /// Record field holding this domain's code. Tyre state is per wheel, see
    /// [`TyrePosition::field`].
    pub fn field(self) -> &'static str {
        match self {
            Domain::GameMode => "game_mode",
            Domain::Location => "location_id",
            Domain::Route => "route_id",
            Domain::Vehicle => "vehicle_id",
            Domain::VehicleClass => "vehicle_class_id",
            Domain::VehicleManufacturer => "vehicle_manufacturer_id",
            Domain::TyreState => "vehicle_tyre_state",
            Domain::StageResultStatus => "stage_result_status",
        }
    }

    /// Largest code the domain's wire field can carry.
    pub fn max_code(self) -> u16 {
        match self {
            Domain::GameMode | Domain::TyreState | Domain::StageResultStatus => u8::MAX as u16,
            _ => u16::MAX,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

/// Wheel selector for the per-wheel tyre state channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum TyrePosition {
    FrontLeft,
    FrontRight,
    BackLeft,
    BackRight,
}

impl TyrePosition {
    pub const ALL: [TyrePosition; 4] =
        [TyrePosition::FrontLeft, TyrePosition::FrontRight, TyrePosition::BackLeft, TyrePosition::BackRight];

    /// Channel name suffix, e.g. `_fl`.
    pub fn suffix(self) -> &'static str {
        match self {
            TyrePosition::FrontLeft => "_fl",
            TyrePosition::FrontRight => "_fr",
            TyrePosition::BackLeft => "_bl",
            TyrePosition::BackRight => "_br",
        }
    }

    /// Parse a suffix; accepts it with or without the leading underscore.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        let suffix = suffix.strip_prefix('_').unwrap_or(suffix);
        Self::ALL.into_iter().find(|p| &p.suffix()[1..] == suffix)
    }

    /// Tyre state channel for this wheel, e.g. `vehicle_tyre_state_fl`.
    pub fn field(self) -> String {
        format!("{}{}", Domain::TyreState.field(), self.suffix())
    }
}

/// Vehicle details beyond its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct VehicleEntry {
    pub id: u16,
    pub name: String,
    pub class_id: u16,
    pub manufacturer_id: u16,
    pub builder: bool,
}

/// Code-to-name mapping for one domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumerationTable {
    names: HashMap<u16, String>,
}

impl EnumerationTable {
    /// Name for a code, or [`UNKNOWN`].
    pub fn describe(&self, code: u16) -> &str {
        self.get(code).unwrap_or(UNKNOWN)
    }

    pub fn get(&self, code: u16) -> Option<&str> {
        self.names.get(&code).map(String::as_str).filter(|name| !name.is_empty())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn from_entries(domain: Domain, entries: &[NamedEntry]) -> Self {
        let mut names = HashMap::with_capacity(entries.len());
        for entry in entries {
            match narrow(domain, entry.id) {
                Some(code) => {
                    names.insert(code, entry.name.clone());
                }
                None => warn!(%domain, id = entry.id, "Id does not fit the channel width, skipping"),
            }
        }
        Self { names }
    }
}

fn narrow(domain: Domain, id: u64) -> Option<u16> {
    u16::try_from(id).ok().filter(|code| *code <= domain.max_code())
}

/// Immutable tables for every [`Domain`], built once from `ids.json`.
#[derive(Debug, Clone, Default)]
pub struct EnumerationTables {
    tables: HashMap<Domain, EnumerationTable>,
    vehicles: HashMap<u16, VehicleEntry>,
    data_version: DataVersion,
}

impl EnumerationTables {
    pub fn from_document(document: &IdsDocument) -> Self {
        let vehicle_names: Vec<NamedEntry> = document
            .vehicles
            .iter()
            .map(|v| NamedEntry { id: v.id, name: v.name.clone() })
            .collect();

        let sources: [(Domain, &[NamedEntry]); 8] = [
            (Domain::GameMode, &document.game_mode),
            (Domain::Location, &document.locations),
            (Domain::Route, &document.routes),
            (Domain::Vehicle, &vehicle_names),
            (Domain::VehicleClass, &document.vehicle_classes),
            (Domain::VehicleManufacturer, &document.vehicle_manufacturers),
            (Domain::TyreState, &document.vehicle_tyre_state),
            (Domain::StageResultStatus, &document.stage_result_status),
        ];
        let tables: HashMap<_, _> = sources
            .into_iter()
            .map(|(domain, entries)| (domain, EnumerationTable::from_entries(domain, entries)))
            .collect();

        // Ids that do not fit were already reported above.
        let vehicles = document
            .vehicles
            .iter()
            .filter_map(|v| {
                let id = narrow(Domain::Vehicle, v.id)?;
                let entry = VehicleEntry {
                    id,
                    name: v.name.clone(),
                    class_id: narrow(Domain::VehicleClass, v.class).unwrap_or_default(),
                    manufacturer_id: narrow(Domain::VehicleManufacturer, v.manufacturer).unwrap_or_default(),
                    builder: v.builder,
                };
                Some((id, entry))
            })
            .collect();

        let data_version = document.versions.data;
        debug!(
            vehicles = tables[&Domain::Vehicle].len(),
            locations = tables[&Domain::Location].len(),
            routes = tables[&Domain::Route].len(),
            build = data_version.build,
            major = data_version.major,
            minor = data_version.minor,
            "Enumeration tables loaded"
        );

        Self { tables, vehicles, data_version }
    }

    /// Name for a code in a domain, or [`UNKNOWN`].
    pub fn describe(&self, domain: Domain, code: u16) -> &str {
        self.tables.get(&domain).map_or(UNKNOWN, |table| table.describe(code))
    }

    pub fn table(&self, domain: Domain) -> Option<&EnumerationTable> {
        self.tables.get(&domain)
    }

    pub fn vehicle(&self, id: u16) -> Option<&VehicleEntry> {
        self.vehicles.get(&id)
    }

    /// Content version of the source `ids.json`.
    pub fn data_version(&self) -> DataVersion {
        self.data_version
    }

    /// Descriptive view over a record.
    pub fn describe_record<'a>(&'a self, record: &'a Record) -> Descriptions<'a> {
        Descriptions { record, tables: self }
    }
}

/// Names for the enumerated fields of one record.
///
/// Every accessor degrades to [`UNKNOWN`] when the field is absent from the
/// record's layout, holds a non-integer value, or carries a code with no name.
#[derive(Debug, Clone, Copy)]
pub struct Descriptions<'a> {
    record: &'a Record,
    tables: &'a EnumerationTables,
}

impl<'a> Descriptions<'a> {
    pub fn new(record: &'a Record, tables: &'a EnumerationTables) -> Self {
        Self { record, tables }
    }

    pub fn game_mode(&self) -> &'a str {
        self.lookup(Domain::GameMode, Domain::GameMode.field())
    }

    pub fn location(&self) -> &'a str {
        self.lookup(Domain::Location, Domain::Location.field())
    }

    pub fn route(&self) -> &'a str {
        self.lookup(Domain::Route, Domain::Route.field())
    }

    pub fn vehicle(&self) -> &'a str {
        self.lookup(Domain::Vehicle, Domain::Vehicle.field())
    }

    pub fn vehicle_class(&self) -> &'a str {
        self.lookup(Domain::VehicleClass, Domain::VehicleClass.field())
    }

    pub fn vehicle_manufacturer(&self) -> &'a str {
        self.lookup(Domain::VehicleManufacturer, Domain::VehicleManufacturer.field())
    }

    pub fn stage_result_status(&self) -> &'a str {
        self.lookup(Domain::StageResultStatus, Domain::StageResultStatus.field())
    }

    pub fn tyre_state(&self, position: TyrePosition) -> &'a str {
        self.lookup(Domain::TyreState, &position.field())
    }

    /// Tyre state selected by a raw suffix such as `"_fl"`; an unrecognised
    /// suffix yields [`UNKNOWN`].
    pub fn tyre_state_by_suffix(&self, suffix: &str) -> &'a str {
        TyrePosition::from_suffix(suffix).map_or(UNKNOWN, |position| self.tyre_state(position))
    }

    fn lookup(&self, domain: Domain, field: &str) -> &'a str {
        let code = self
            .record
            .get(field)
            .ok()
            .and_then(|value| value.as_code())
            .and_then(|code| u16::try_from(code).ok());
        match code {
            Some(code) => self.tables.describe(domain, code),
            None => UNKNOWN,
        }
    }
}
