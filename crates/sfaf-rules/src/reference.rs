//! # Reference Data — MCEB Annex Lists
//!
//! Open-ended code lists consulted by the validator (station classes,
//! geographic codes, IRAC notes, function identifiers) and the optional
//! reference-data bundle that extends them.
//!
//! ## Bundle format
//!
//! ```json
//! { "coordination": { "C010": { "code": "C010", "title": "Gulf Area Frequency Coordinator" } } }
//! ```
//!
//! A flat `{ "C010": "Gulf Area Frequency Coordinator" }` map is also
//! accepted and bucketed by the code's first letter.
//!
//! ## Loading
//!
//! [`ReferenceLoader`] loads a bundle at most once. A bundle that cannot be
//! read or decoded is logged at `warn` and replaced by
//! [`ReferenceData::fallback`]; the failure never reaches the validator.
//! Membership checks always accept the built-in lists, so core validation
//! does not depend on the bundle being present.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use sfaf_core::SfafError;

/// One code in the bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    /// The code, e.g. `C010`. Defaults to the bundle key when omitted.
    #[serde(default)]
    pub code: String,
    /// Short title.
    pub title: String,
    /// Longer description, when the bundle provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ReferenceEntry {
    fn new(code: &str, title: &str) -> Self {
        Self {
            code: code.to_string(),
            title: title.to_string(),
            description: None,
        }
    }

    fn matches(&self, needle: &str) -> bool {
        self.code.to_lowercase().contains(needle)
            || self.title.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }
}

// ─── Built-in Lists ─────────────────────────────────────────────────

/// Station classes from MCEB Pub 7 Annex A.
pub const STATION_CLASSES: &[&str] = &[
    "FB", "FB2", "FB3", "FB8", "FX1", "ML", "MA", "MO", "MP", "MR", "MS", "MT", "BC", "BT", "AC",
    "AD", "AF", "AG", "AL", "AR", "AS", "AT", "CG", "CP", "CS", "CT", "HA", "XE", "XF", "XM",
    "XR", "XT",
];

/// State, territory and country codes accepted in fields 300/400.
pub const GEOGRAPHIC_CODES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY", "DC", "PR", "VI", "GUM", "SMA", "MRA", "MDW", "PLM", "WAK",
    "JON", "CAN", "MEX", "USA", "GBR", "FRA", "DEU", "JPN", "AUS",
];

/// IRAC notes from MCEB Pub 7 Annex E: `(code, category, title)`.
pub const IRAC_NOTES: &[(&str, &str, &str)] = &[
    ("C002", "coordination", "Western Area Frequency Coordinator coordination required"),
    ("C004", "coordination", "Eastern Area Frequency Coordinator coordination required"),
    ("C006", "coordination", "White Sands Missile Range coordination required"),
    ("C008", "coordination", "Arizona Area Frequency Coordinator coordination required"),
    ("C010", "coordination", "Gulf Area Frequency Coordinator coordination required"),
    ("C012", "coordination", "Pacific Joint Frequency Management Office coordination required"),
    ("C019", "coordination", "Army Frequency Management Office coordination required"),
    ("C060", "coordination", "Military installation commander coordination required"),
    ("E028", "emission", "Lower sideband transmission authorized"),
    ("E029", "emission", "Upper sideband transmission authorized"),
    ("E035", "emission", "Lower sideband transmission"),
    ("E036", "emission", "Upper sideband transmission"),
    ("L012", "limitation", "Emergency use only - life/safety/property protection"),
    ("L116", "limitation", "Daytime use only"),
    ("L131", "limitation", "Nighttime use only"),
    ("L174", "limitation", "Army communications only"),
    ("L180", "limitation", "Coast Guard communications only"),
    ("L187", "limitation", "Military communications only"),
    ("L190", "limitation", "Navy communications only"),
    ("L282", "limitation", "Back-up use only when regular channels disrupted"),
    ("S063", "special", "Search and rescue communications"),
    ("S142", "special", "Drone control operations"),
    ("S148", "special", "National emergency communications"),
];

/// Major function identifiers from MCEB Pub 7 Annex G.
pub const MAJOR_FUNCTIONS: &[&str] = &[
    "AIR OPERATIONS",
    "TACTICAL OPERATIONS",
    "TRAINING",
    "COMMUNICATIONS",
    "INTELLIGENCE",
    "MEDICAL",
    "LAW ENFORCEMENT",
    "RANGE OPERATIONS",
    "SUSTAINING OPERATIONS",
    "SPACE OPERATIONS",
    "EMERGENCY SERVICES",
    "COMMAND AND CONTROL",
    "DATA LINK",
    "SPECIAL OPERATIONS",
    "DOMESTIC SUPPORT OPERATIONS",
    "OTHER OPERATIONS",
];

/// Intermediate function identifiers from MCEB Pub 7 Annex G.
pub const INTERMEDIATE_FUNCTIONS: &[&str] = &[
    // Air operations
    "FLIGHT OPERATIONS", "FLIGHT TEST", "FORWARD AIR CONTROL POST", "GCA",
    "PILOT-TO-DISPATCHER", "PILOT-TO-METRO", "PILOT-TO-PILOT", "RAMP CONTROL", "REFUELING",
    "SHIP/AIR OPERATIONS", "AIR DEFENSE", "AIR DEFENSE WARNING", "AIR DEFENSE / INTERCEPT",
    "AIR FORCE ONE", "AIR FORCE SPECIAL OPERATIONS", "AIR ROUTE SURVEILLANCE RADAR",
    "AIR TRAFFIC CONTROL", "AIR/AIR COMMUNICATIONS", "AIR/GROUND/AIR COMMUNICATIONS",
    "AIRBORNE COMMAND CENTER", "AIRCRAFT", "AIRPORT SURVEILLANCE RADAR", "APPROACH CONTROL",
    "ARMY AVIATION",
    // Training
    "TRAINING", "INSTRUCTOR/STUDENT TRAINING", "EXERCISE", "EXPERIMENTAL", "SIMULATOR",
    "AERO CLUB", "EDUCATION",
    // Tactical
    "TACTICAL OPERATIONS", "GROUND OPERATIONS", "SEA OPERATIONS", "SPECIAL OPERATIONS",
    "PSYCHOLOGICAL OPERATIONS", "FIRE SUPPORT", "INFANTRY", "GROUND INTERDICTION", "ARTILLERY",
    "MISSILE", "SPECIAL FORCES", "RANGER UNITS", "NAVY SPECIAL OPERATIONS",
    "NAVAL GUNFIRE SUPPORT", "TARGET ACQUISITION", "TARGET SCORING", "TARGET",
    // Communications
    "COMMUNICATIONS", "SATELLITE COMMUNICATIONS", "RADIO RELAY", "MICROWAVE", "MILSTAR",
    "FLTSATCOM", "GLOBAL", "MARS", "AFSATCOM", "DSCS", "LEASAT", "SPITFIRE", "TROJAN SPIRIT",
    "MSE", "TACTS", "IONOSPHERIC SOUNDER", "ISYSCON", "GCCS", "MICROWAVE DATA LINK",
    // Intelligence
    "INTELLIGENCE", "SURVEILLANCE", "RECONNAISSANCE", "SURVEILLANCE/RECONNAISSANCE", "ACS",
    "AHFEWS", "ARL", "TRACKWOLF", "TRAILBLAZER", "TEAMMATE",
    // Law enforcement
    "LAW ENFORCEMENT", "SECURITY FORCE", "MILITARY POLICE", "SHORE PATROL", "FIRE", "HAZMAT",
    "CID", "DIS", "NCIS", "OSI", "SCOPE SHIELD", "SPEED MEASUREMENT SYSTEMS",
    "SURVEILLANCE SYSTEMS", "TETHERED AEROSTAT RADAR", "WEAPONS STORAGE PROTECTION",
    "ALARM SYSTEMS", "DISASTER PLANNING", "EOD", "ANTI-TERRORISM", "CIVIL DISTURBANCES",
    "COUNTER DRUG", "PROJECT COTHEN", "SPECIAL SECURITY OPERATIONS",
    // Emergency services
    "EMERGENCY SERVICES", "WARNING SYSTEM", "CONSEQUENCE MANAGEMENT", "CBR",
    "CIVIL SUPPORT TEAM", "ENVIRONMENTAL CLEANUP", "FEMA", "HAZARDOUS MATERIAL RELEASE",
    "TECHNICAL ESCORT UNIT", "MUTUAL AID",
    // Weather
    "WEATHER", "WEATHER RADAR", "WIND PROFILER", "AMSS", "ASOS", "AWOS", "GOES", "IMETS",
    "NEXRAD", "RADIOSONDE", "SAWDS",
    // Range
    "RANGE OPERATIONS", "RANGE CONTROL", "RDTE SUPPORT", "TEST AND MEASUREMENT",
    "TEST RANGE TIMING", "TEST RANGE", "RDMS", "OCCS SUPPORT",
    // Sustaining
    "SUSTAINING OPERATIONS", "FLEET SUPPORT", "PUBLIC WORKS", "NATURAL RESOURCES",
    "RESOURCES CONSERVATION", "SAFETY", "LOCKS AND DAMS", "HYDROLOGIC", "METEOROLOGICAL",
    "SEISMIC", "NAVAIDS", "NAVIGATION RADAR", "CIVIL ENGINEERING", "CIVIL WORKS",
    "CONSTRUCTION", "INDUSTRIAL CONTROLS", "PRIME BEEF", "RED HORSE", "SEABEES", "UTILITIES",
    "WILDLIFE PRESERVATION", "NAVAIDS CONTROLS", "REMOTE BARRIER CONTROL SYSTEMS",
    "RUNWAY LIGHTING CONTROL",
    // Space
    "SPACE OPERATIONS", "GPS", "SHUTTLE", "NASA", "SGLS", "ARTS", "TELEMETRY", "TELECOMMAND",
    "UAV",
    // Logistics
    "LOGISTICS", "MAINTENANCE", "MUNITIONS", "POL", "RESUPPLY", "INVENTORY/INVENTORY CONTROLS",
    "SUPPLY AND LOGISTICS", "SHIPYARD", "TRANSPORTATION", "TAXI", "AMPS", "CSSCS", "MTS",
    "RF TAGS",
    // Global
    "WORLDWIDE", "CONUS", "NATO", "OTHER OPERATIONS", "SPECIAL PROJECTS", "HAARP", "SURVEY",
    "DTSS", "ETRAC",
];

// ─── Reference Lists ────────────────────────────────────────────────

/// An open-ended list a field value is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceList {
    /// Field 113.
    StationClass,
    /// Fields 300 and 400.
    GeographicCode,
    /// Field 500.
    IracNote,
    /// Field 511.
    MajorFunction,
    /// Field 512.
    IntermediateFunction,
    /// Field 513.
    FunctionIdentifier,
}

impl ReferenceList {
    /// Bundle categories whose codes extend this list.
    pub fn categories(self) -> &'static [&'static str] {
        match self {
            Self::StationClass => &["station_class"],
            Self::GeographicCode => &["geographic"],
            Self::IracNote => &["coordination", "emission", "limitation", "special", "priority", "other"],
            Self::MajorFunction => &["major_function"],
            Self::IntermediateFunction => &["intermediate_function"],
            Self::FunctionIdentifier => &["function_identifier", "major_function", "intermediate_function"],
        }
    }

    /// Whether `code` is on the built-in list.
    pub fn builtin_contains(self, code: &str) -> bool {
        match self {
            Self::StationClass => STATION_CLASSES.contains(&code),
            Self::GeographicCode => GEOGRAPHIC_CODES.contains(&code),
            Self::IracNote => IRAC_NOTES.iter().any(|(c, _, _)| *c == code),
            Self::MajorFunction => MAJOR_FUNCTIONS.contains(&code),
            Self::IntermediateFunction => INTERMEDIATE_FUNCTIONS.contains(&code),
            Self::FunctionIdentifier => {
                MAJOR_FUNCTIONS.contains(&code) || INTERMEDIATE_FUNCTIONS.contains(&code)
            }
        }
    }

    /// Diagnostic for a value that is not on the list.
    pub fn mismatch_message(self) -> &'static str {
        match self {
            Self::StationClass => "station class not in MCEB Pub 7 Annex A list; verify against MCEB Pub 7 Annex A",
            Self::GeographicCode => "state/country code not in MCEB Pub 7 geographic code list; verify code is correct",
            Self::IracNote => "IRAC note not in official MCEB Pub 7 Annex E list; verify code is correct",
            Self::MajorFunction | Self::IntermediateFunction | Self::FunctionIdentifier => {
                "function identifier not in official MCEB Pub 7 Annex G list; verify identifier is correct"
            }
        }
    }
}

// ─── Reference Data Bundle ──────────────────────────────────────────

/// Category name for a code's first letter, used for flat bundles.
fn category_for_prefix(code: &str) -> &'static str {
    match code.chars().next().map(|c| c.to_ascii_uppercase()) {
        Some('C') => "coordination",
        Some('E') => "emission",
        Some('L') => "limitation",
        Some('S') => "special",
        Some('P') => "priority",
        _ => "other",
    }
}

/// Code prefix for a well-known category name.
fn prefix_for_category(key: &str) -> Option<char> {
    match key.to_lowercase().as_str() {
        "coordination" | "c" => Some('C'),
        "emission" | "e" => Some('E'),
        "limitation" | "l" => Some('L'),
        "special" | "s" => Some('S'),
        "priority" | "p" => Some('P'),
        _ => None,
    }
}

/// Loaded reference data: category → code → entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceData {
    categories: BTreeMap<String, BTreeMap<String, ReferenceEntry>>,
}

impl ReferenceData {
    /// The minimal list substituted when a bundle cannot be loaded.
    pub fn fallback() -> Self {
        let mut data = Self::default();
        data.insert("coordination", ReferenceEntry::new("C010", "Gulf Area Frequency Coordinator"));
        data.insert("limitation", ReferenceEntry::new("L012", "Emergency use only"));
        data.insert("special", ReferenceEntry::new("S142", "Drone Control"));
        data.insert("special", ReferenceEntry::new("S148", "National emergency communications"));
        data
    }

    /// The built-in IRAC notes as a bundle.
    pub fn builtin_irac_notes() -> Self {
        let mut data = Self::default();
        for (code, category, title) in IRAC_NOTES {
            data.insert(category, ReferenceEntry::new(code, title));
        }
        data
    }

    /// Add an entry, replacing any entry with the same code in that category.
    pub fn insert(&mut self, category: &str, entry: ReferenceEntry) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .insert(entry.code.clone(), entry);
    }

    /// Decode a bundle from JSON text, categorized or flat.
    pub fn from_json_str(text: &str) -> Result<Self, SfafError> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Object(top) = value else {
            return Err(SfafError::ReferenceData {
                path: "<inline>".to_string(),
                reason: "bundle must be a JSON object".to_string(),
            });
        };

        let is_flat = top.values().all(Value::is_string);
        let mut data = Self::default();
        if is_flat {
            for (code, title) in &top {
                let title = title.as_str().unwrap_or_default();
                data.insert(category_for_prefix(code), ReferenceEntry::new(code, title));
            }
            return Ok(data);
        }

        for (category, codes) in top {
            let codes: BTreeMap<String, Value> = serde_json::from_value(codes)?;
            for (code, raw) in codes {
                let entry = match raw {
                    Value::String(title) => ReferenceEntry::new(&code, &title),
                    other => {
                        let mut entry: ReferenceEntry = serde_json::from_value(other)?;
                        if entry.code.is_empty() {
                            entry.code = code.clone();
                        }
                        entry
                    }
                };
                data.insert(&category, entry);
            }
        }
        Ok(data)
    }

    /// Read and decode a bundle file.
    pub fn load(path: &Path) -> Result<Self, SfafError> {
        let text = std::fs::read_to_string(path).map_err(|e| SfafError::ReferenceData {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&text).map_err(|e| SfafError::ReferenceData {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Category names in the bundle.
    pub fn category_names(&self) -> Vec<&str> {
        self.categories.keys().map(String::as_str).collect()
    }

    /// Every entry, sorted by code.
    pub fn all_entries(&self) -> Vec<&ReferenceEntry> {
        let mut entries: Vec<&ReferenceEntry> =
            self.categories.values().flat_map(BTreeMap::values).collect();
        entries.sort_by(|a, b| a.code.cmp(&b.code));
        entries
    }

    /// Case-insensitive substring search over code, title and description.
    pub fn search(&self, query: &str) -> Vec<&ReferenceEntry> {
        let needle = query.trim().to_lowercase();
        self.all_entries()
            .into_iter()
            .filter(|e| e.matches(&needle))
            .collect()
    }

    /// Entries of a category, sorted by code.
    ///
    /// When the bundle has no such category, well-known category names
    /// (`coordination`, `limitation`, ...) fall back to matching the code
    /// prefix across all entries.
    pub fn by_category(&self, key: &str) -> Vec<&ReferenceEntry> {
        if let Some(codes) = self.categories.get(key) {
            return codes.values().collect();
        }
        match prefix_for_category(key) {
            Some(prefix) => self
                .all_entries()
                .into_iter()
                .filter(|e| e.code.starts_with(prefix))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Whether any of `list`'s categories carries `code`.
    pub fn contains(&self, list: ReferenceList, code: &str) -> bool {
        list.categories()
            .iter()
            .filter_map(|c| self.categories.get(*c))
            .any(|codes| codes.contains_key(code))
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.categories.values().map(BTreeMap::len).sum()
    }

    /// Whether the bundle has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ─── Loader ─────────────────────────────────────────────────────────

/// Loads a reference bundle at most once and caches it.
#[derive(Debug, Default)]
pub struct ReferenceLoader {
    path: Option<PathBuf>,
    data: OnceLock<Arc<ReferenceData>>,
}

impl ReferenceLoader {
    /// A loader for the bundle at `path`; `None` yields the fallback list.
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            data: OnceLock::new(),
        }
    }

    /// Whether the bundle has been loaded (or replaced by the fallback).
    pub fn is_ready(&self) -> bool {
        self.data.get().is_some()
    }

    /// The loaded data, loading on first call.
    pub fn get(&self) -> Arc<ReferenceData> {
        Arc::clone(self.data.get_or_init(|| Arc::new(self.load_or_fallback())))
    }

    fn load_or_fallback(&self) -> ReferenceData {
        let Some(path) = &self.path else {
            tracing::debug!("no reference bundle configured; using fallback list");
            return ReferenceData::fallback();
        };
        match ReferenceData::load(path) {
            Ok(data) => {
                tracing::info!(
                    path = %path.display(),
                    entries = data.len(),
                    "loaded reference data"
                );
                data
            }
            Err(e) => {
                tracing::warn!(error = %e, "reference data unavailable; using fallback list");
                ReferenceData::fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_fallback_contents() {
        let data = ReferenceData::fallback();
        let codes: Vec<&str> = data.all_entries().iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, ["C010", "L012", "S142", "S148"]);
    }

    #[test]
    fn test_categorized_bundle() {
        let data = ReferenceData::from_json_str(
            r#"{
                "coordination": {"C999": {"code": "C999", "title": "Test coordinator", "description": "Lab only"}},
                "station_class": {"ZZ": "Test station"}
            }"#,
        )
        .unwrap();
        assert_eq!(data.len(), 2);
        assert!(data.contains(ReferenceList::IracNote, "C999"));
        assert!(data.contains(ReferenceList::StationClass, "ZZ"));
        assert!(!data.contains(ReferenceList::GeographicCode, "ZZ"));
    }

    #[test]
    fn test_flat_bundle_bucketed_by_prefix() {
        let data =
            ReferenceData::from_json_str(r#"{"C010": "Gulf", "L116": "Daytime", "X1": "Odd"}"#)
                .unwrap();
        assert_eq!(data.by_category("coordination").len(), 1);
        assert_eq!(data.by_category("limitation")[0].code, "L116");
        assert_eq!(data.by_category("other")[0].code, "X1");
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(ReferenceData::from_json_str("[1, 2]").is_err());
        assert!(ReferenceData::from_json_str("not json").is_err());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let data = ReferenceData::builtin_irac_notes();
        let hits: Vec<&str> = data.search("SIDEBAND").iter().map(|e| e.code.as_str()).collect();
        assert_eq!(hits, ["E028", "E029", "E035", "E036"]);
        assert_eq!(data.search("l116").len(), 1);
        assert!(data.search("no such note").is_empty());
    }

    #[test]
    fn test_by_category_prefix_fallback() {
        let mut data = ReferenceData::default();
        data.insert("misc", ReferenceEntry::new("S063", "Search and rescue"));
        data.insert("misc", ReferenceEntry::new("C002", "Western Area"));
        let special = data.by_category("special");
        assert_eq!(special.len(), 1);
        assert_eq!(special[0].code, "S063");
        assert!(data.by_category("unknown").is_empty());
    }

    #[test]
    fn test_builtin_lists() {
        assert!(ReferenceList::StationClass.builtin_contains("MO"));
        assert!(!ReferenceList::StationClass.builtin_contains("QQ"));
        assert!(ReferenceList::GeographicCode.builtin_contains("TX"));
        assert!(ReferenceList::IracNote.builtin_contains("S142"));
        assert!(ReferenceList::FunctionIdentifier.builtin_contains("AIR OPERATIONS"));
        assert!(ReferenceList::FunctionIdentifier.builtin_contains("FLIGHT TEST"));
        assert!(!ReferenceList::MajorFunction.builtin_contains("FLIGHT TEST"));
    }

    #[test]
    fn test_loader_falls_back_on_missing_file() {
        let loader = ReferenceLoader::new(Some(PathBuf::from("/nonexistent/reference.json")));
        assert!(!loader.is_ready());
        let data = loader.get();
        assert!(loader.is_ready());
        assert_eq!(*data, ReferenceData::fallback());
    }

    #[test]
    fn test_loader_reads_bundle_once() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"special": {{"S900": {{"code": "S900", "title": "Test"}}}}}}"#).unwrap();
        let loader = ReferenceLoader::new(Some(file.path().to_path_buf()));
        let first = loader.get();
        let second = loader.get();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(first.contains(ReferenceList::IracNote, "S900"));
    }
}
