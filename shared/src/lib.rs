use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a wire string does not name a known enum value
#[derive(Debug, Clone, PartialEq)]
pub struct EnumParseError {
    /// Field the value was supplied for, e.g. "status"
    pub field: &'static str,
    /// The rejected input
    pub value: String,
    /// Accepted spellings
    pub expected: &'static [&'static str],
}

impl fmt::Display for EnumParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid {} '{}': expected one of {}",
            self.field,
            self.value,
            self.expected.join(", ")
        )
    }
}

impl std::error::Error for EnumParseError {}

/// Lifecycle status of a puppy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PuppyStatus {
    Available,
    Reserved,
    Sold,
}

impl PuppyStatus {
    pub const NAMES: &'static [&'static str] = &["Available", "Reserved", "Sold"];

    pub fn as_str(&self) -> &'static str {
        match self {
            PuppyStatus::Available => "Available",
            PuppyStatus::Reserved => "Reserved",
            PuppyStatus::Sold => "Sold",
        }
    }

    /// Whether the puppy still keeps its litter on the current listing
    pub fn is_open(&self) -> bool {
        matches!(self, PuppyStatus::Available | PuppyStatus::Reserved)
    }
}

impl Default for PuppyStatus {
    fn default() -> Self {
        PuppyStatus::Available
    }
}

impl fmt::Display for PuppyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PuppyStatus {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(PuppyStatus::Available),
            "reserved" => Ok(PuppyStatus::Reserved),
            "sold" => Ok(PuppyStatus::Sold),
            _ => Err(EnumParseError {
                field: "status",
                value: s.to_string(),
                expected: Self::NAMES,
            }),
        }
    }
}

/// Gender of a dog, also used as the waitlist segment key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const NAMES: &'static [&'static str] = &["male", "female"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(EnumParseError {
                field: "gender",
                value: s.to_string(),
                expected: Self::NAMES,
            }),
        }
    }
}

/// Coat color of a puppy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PuppyColor {
    Black,
    Fawn,
    Apricot,
}

impl PuppyColor {
    pub const NAMES: &'static [&'static str] = &["black", "fawn", "apricot"];

    pub fn as_str(&self) -> &'static str {
        match self {
            PuppyColor::Black => "black",
            PuppyColor::Fawn => "fawn",
            PuppyColor::Apricot => "apricot",
        }
    }
}

impl fmt::Display for PuppyColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PuppyColor {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "black" => Ok(PuppyColor::Black),
            "fawn" => Ok(PuppyColor::Fawn),
            "apricot" => Ok(PuppyColor::Apricot),
            _ => Err(EnumParseError {
                field: "color",
                value: s.to_string(),
                expected: Self::NAMES,
            }),
        }
    }
}

/// Color preference on a waitlist entry; `Any` when the customer left it blank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorPreference {
    Any,
    Black,
    Fawn,
    Apricot,
}

impl ColorPreference {
    pub const NAMES: &'static [&'static str] = &["any", "black", "fawn", "apricot"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorPreference::Any => "any",
            ColorPreference::Black => "black",
            ColorPreference::Fawn => "fawn",
            ColorPreference::Apricot => "apricot",
        }
    }

    /// Parse an optional form value, treating a missing or blank value as `Any`
    pub fn from_optional(value: Option<&str>) -> Result<Self, EnumParseError> {
        match value.map(str::trim) {
            None | Some("") => Ok(ColorPreference::Any),
            Some(v) => v.parse(),
        }
    }
}

impl Default for ColorPreference {
    fn default() -> Self {
        ColorPreference::Any
    }
}

impl fmt::Display for ColorPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorPreference {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(ColorPreference::Any),
            "black" => Ok(ColorPreference::Black),
            "fawn" => Ok(ColorPreference::Fawn),
            "apricot" => Ok(ColorPreference::Apricot),
            _ => Err(EnumParseError {
                field: "color_preference",
                value: s.to_string(),
                expected: Self::NAMES,
            }),
        }
    }
}

/// Admin-managed status of a waitlist entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitlistStatus {
    #[serde(alias = "waiting")]
    Pending,
    Contacted,
    Completed,
}

impl WaitlistStatus {
    pub const NAMES: &'static [&'static str] = &["pending", "waiting", "contacted", "completed"];

    pub fn as_str(&self) -> &'static str {
        match self {
            WaitlistStatus::Pending => "pending",
            WaitlistStatus::Contacted => "contacted",
            WaitlistStatus::Completed => "completed",
        }
    }
}

impl Default for WaitlistStatus {
    fn default() -> Self {
        WaitlistStatus::Pending
    }
}

impl fmt::Display for WaitlistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WaitlistStatus {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" | "waiting" => Ok(WaitlistStatus::Pending),
            "contacted" => Ok(WaitlistStatus::Contacted),
            "completed" => Ok(WaitlistStatus::Completed),
            _ => Err(EnumParseError {
                field: "status",
                value: s.to_string(),
                expected: Self::NAMES,
            }),
        }
    }
}

/// Which public listing a litter belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LitterClassification {
    Current,
    Past,
}

/// A date together with the phrase it should be shown under ("Expected by" / "Born on")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateFraming {
    pub label: String,
    /// Calendar date, YYYY-MM-DD
    pub date: String,
}

/// A puppy as exposed over the API. Always belongs to exactly one litter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Puppy {
    pub id: String,
    pub litter_id: String,
    pub name: String,
    pub color: PuppyColor,
    pub gender: Gender,
    pub status: PuppyStatus,
    pub price: Option<f64>,
    pub description: Option<String>,
    /// Opaque image key resolved by the image server
    pub profile_image: String,
    /// RFC 3339 timestamp
    pub created_at: String,
    /// RFC 3339 timestamp
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Litter {
    pub id: String,
    pub name: String,
    /// Set when the mother is one of the kennel's own grumble members
    pub mother_id: Option<String>,
    pub father_id: Option<String>,
    /// Display name resolved from the member record or the external name
    pub mother_name: String,
    pub father_name: String,
    /// YYYY-MM-DD
    pub birth_date: String,
    /// YYYY-MM-DD
    pub available_date: String,
    pub birth_framing: DateFraming,
    pub profile_image: String,
    pub classification: LitterClassification,
    pub puppies: Vec<Puppy>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LitterListResponse {
    pub litters: Vec<Litter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LitterResponse {
    pub litter: Litter,
    pub success_message: String,
}

/// Request to create a litter. Each parent is given either as a grumble member id
/// or as an external name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateLitterRequest {
    pub name: Option<String>,
    pub mother_id: Option<String>,
    pub external_mother_name: Option<String>,
    pub father_id: Option<String>,
    pub external_father_name: Option<String>,
    /// YYYY-MM-DD
    pub birth_date: Option<String>,
    /// YYYY-MM-DD
    pub available_date: Option<String>,
    /// Key of an already-uploaded image; the placeholder is used when absent
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateLitterRequest {
    pub name: Option<String>,
    pub mother_id: Option<String>,
    pub external_mother_name: Option<String>,
    pub father_id: Option<String>,
    pub external_father_name: Option<String>,
    pub birth_date: Option<String>,
    pub available_date: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteLitterResponse {
    pub litter_id: String,
    pub deleted_puppies: usize,
    pub released_images: usize,
    pub success_message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatePuppyRequest {
    pub name: Option<String>,
    pub color: Option<String>,
    pub gender: Option<String>,
    /// Defaults to "Available"
    pub status: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddPuppiesRequest {
    pub puppies: Vec<CreatePuppyRequest>,
}

/// Partial puppy update; omitted fields stay unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePuppyRequest {
    pub name: Option<String>,
    pub color: Option<String>,
    pub gender: Option<String>,
    pub status: Option<String>,
    pub price: Option<f64>,
    /// Remove the price entirely (takes precedence over `price`)
    #[serde(default)]
    pub clear_price: bool,
    pub description: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuppyResponse {
    pub puppy: Puppy,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuppyBatchResponse {
    pub puppies: Vec<Puppy>,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success_message: String,
}

/// Adult breeding-stock dog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrumbleMember {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub description: String,
    /// YYYY-MM-DD
    pub birth_date: String,
    pub profile_image: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateGrumbleMemberRequest {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub description: Option<String>,
    pub birth_date: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateGrumbleMemberRequest {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub description: Option<String>,
    pub birth_date: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrumbleMemberResponse {
    pub member: GrumbleMember,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrumbleListResponse {
    pub members: Vec<GrumbleMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub id: String,
    pub name: String,
    /// Display form, XXX-XXX-XXXX
    pub phone: String,
    pub gender_preference: Gender,
    pub color_preference: ColorPreference,
    pub status: WaitlistStatus,
    pub notes: String,
    /// RFC 3339 timestamp
    pub submitted_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JoinWaitlistRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub gender_preference: Option<String>,
    /// Blank or absent means "any"
    pub color_preference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitlistEntryResponse {
    pub entry: WaitlistEntry,
    pub success_message: String,
}

/// One of a caller's places in line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitlistPosition {
    pub segment: Gender,
    pub color_preference: ColorPreference,
    /// 1-based rank within the gender segment
    pub rank: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitlistPositionResponse {
    pub found: bool,
    pub positions: Vec<WaitlistPosition>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedWaitlistEntry {
    pub entry: WaitlistEntry,
    pub rank: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitlistListResponse {
    pub entries: Vec<RankedWaitlistEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateWaitlistEntryRequest {
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub waitlist_enabled: bool,
}

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable machine-readable code, e.g. "duplicate_entry"
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unreleased_images: Vec<String>,
}
