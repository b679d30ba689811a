//! The static attribute catalog.
//!
//! Every EFLR kind exposes a fixed, ordered list of attributes. The catalog
//! drives three things: the order of template rows in a set's body, the
//! per-item emission of value rows (absent attributes still occupy a
//! position), and validation of the values a caller supplies.

use crate::codec::ReprCode;
use crate::rp66::eflr_type;

/// The kinds of explicitly formatted logical records a [`Set`](super::Set)
/// can hold.
///
/// The FILE-HEADER record is not listed here; its template is fixed by the
/// standard and it is modelled separately as
/// [`FileHeader`](super::FileHeader).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetKind {
    /// Creation context of a logical file.
    Origin,
    /// A coordinate axis for multidimensional values.
    Axis,
    /// One column of a frame.
    Channel,
    /// A table of co-sampled channels.
    Frame,
    /// A depth or time interval.
    Zone,
    /// A named, possibly zoned, value.
    Parameter,
    /// A piece of surface or downhole equipment.
    Equipment,
    /// A logging tool assembled from equipment.
    Tool,
    /// A computed, possibly zoned, value.
    Computation,
    /// A data-processing step.
    Process,
    /// A calibration tying channels to coefficients and measurements.
    Calibration,
    /// A single calibration measurement.
    CalibrationMeasurement,
    /// A set of calibration coefficients.
    CalibrationCoefficient,
    /// A named collection of items or other groups.
    Group,
    /// A splice combining input channels into an output channel.
    Splice,
    /// The geometric path of a frame's measurements.
    Path,
    /// The well reference point.
    WellReferencePoint,
    /// A structured long name.
    LongName,
    /// An operator message.
    Message,
    /// A free-text comment.
    Comment,
    /// A descriptor for unformatted data records.
    NoFormat,
}

/// The value class an attribute accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Any integer or float.
    Numeric,
    /// Integers only.
    Integer,
    /// Text.
    Text,
    /// A units expression.
    UnitsText,
    /// An item reference.
    Reference,
    /// An item reference qualified by set type.
    ObjReference,
    /// An item reference or text.
    ReferenceOrText,
    /// A date-time.
    DateTime,
    /// A date-time or a number (e.g. seconds since an event).
    DateTimeOrNumeric,
    /// A boolean or 0/1.
    Status,
    /// No restriction.
    Any,
}

/// One entry of an EFLR kind's attribute catalog.
#[derive(Debug, Clone, Copy)]
pub struct AttrSpec {
    /// Canonical attribute label.
    pub label: &'static str,
    /// Default representation code, if the kind fixes one.
    pub code: Option<ReprCode>,
    /// The value class accepted by this attribute.
    pub kind: ValueKind,
    /// Whether a list of values is allowed.
    pub multivalued: bool,
    /// Whether nested lists of values are allowed.
    pub multidimensional: bool,
}

const fn attr(label: &'static str, code: Option<ReprCode>, kind: ValueKind) -> AttrSpec {
    AttrSpec {
        label,
        code,
        kind,
        multivalued: false,
        multidimensional: false,
    }
}

const fn list(label: &'static str, code: Option<ReprCode>, kind: ValueKind) -> AttrSpec {
    AttrSpec {
        label,
        code,
        kind,
        multivalued: true,
        multidimensional: false,
    }
}

const fn grid(label: &'static str, code: Option<ReprCode>, kind: ValueKind) -> AttrSpec {
    AttrSpec {
        label,
        code,
        kind,
        multivalued: true,
        multidimensional: true,
    }
}

use ValueKind::*;

const ORIGIN: &[AttrSpec] = &[
    attr("FILE-ID", Some(ReprCode::Ascii), Text),
    attr("FILE-SET-NAME", Some(ReprCode::Ident), Text),
    attr("FILE-SET-NUMBER", Some(ReprCode::Uvari), Integer),
    attr("FILE-NUMBER", Some(ReprCode::Uvari), Integer),
    attr("FILE-TYPE", Some(ReprCode::Ident), Text),
    attr("PRODUCT", Some(ReprCode::Ascii), Text),
    attr("VERSION", Some(ReprCode::Ascii), Text),
    list("PROGRAMS", Some(ReprCode::Ascii), Text),
    attr("CREATION-TIME", Some(ReprCode::Dtime), DateTime),
    attr("ORDER-NUMBER", Some(ReprCode::Ascii), Text),
    attr("DESCENT-NUMBER", Some(ReprCode::Unorm), Integer),
    attr("RUN-NUMBER", Some(ReprCode::Unorm), Integer),
    attr("WELL-ID", Some(ReprCode::Unorm), Integer),
    attr("WELL-NAME", Some(ReprCode::Ascii), Text),
    attr("FIELD-NAME", Some(ReprCode::Ascii), Text),
    attr("PRODUCER-CODE", Some(ReprCode::Unorm), Integer),
    attr("PRODUCER-NAME", Some(ReprCode::Ascii), Text),
    attr("COMPANY", Some(ReprCode::Ascii), Text),
    attr("NAME-SPACE-NAME", Some(ReprCode::Ident), Text),
    attr("NAME-SPACE-VERSION", Some(ReprCode::Uvari), Integer),
];

const AXIS: &[AttrSpec] = &[
    attr("AXIS-ID", Some(ReprCode::Ident), Text),
    list("COORDINATES", None, Any),
    attr("SPACING", None, Numeric),
];

const CHANNEL: &[AttrSpec] = &[
    attr("LONG-NAME", None, ReferenceOrText),
    list("PROPERTIES", Some(ReprCode::Ident), Text),
    attr("REPRESENTATION-CODE", Some(ReprCode::Ushort), Integer),
    attr("UNITS", Some(ReprCode::Units), UnitsText),
    list("DIMENSION", Some(ReprCode::Uvari), Integer),
    list("AXIS", Some(ReprCode::Obname), Reference),
    list("ELEMENT-LIMIT", Some(ReprCode::Uvari), Integer),
    attr("SOURCE", Some(ReprCode::Objref), ObjReference),
    attr("MINIMUM-VALUE", Some(ReprCode::Fdoubl), Numeric),
    attr("MAXIMUM-VALUE", Some(ReprCode::Fdoubl), Numeric),
];

const FRAME: &[AttrSpec] = &[
    attr("DESCRIPTION", Some(ReprCode::Ascii), Text),
    list("CHANNELS", Some(ReprCode::Obname), Reference),
    attr("INDEX-TYPE", Some(ReprCode::Ident), Text),
    attr("DIRECTION", Some(ReprCode::Ident), Text),
    attr("SPACING", None, Numeric),
    attr("ENCRYPTED", Some(ReprCode::Ushort), Status),
    attr("INDEX-MIN", None, Numeric),
    attr("INDEX-MAX", None, Numeric),
];

const ZONE: &[AttrSpec] = &[
    attr("DESCRIPTION", Some(ReprCode::Ascii), Text),
    attr("DOMAIN", Some(ReprCode::Ident), Text),
    attr("MAXIMUM", None, DateTimeOrNumeric),
    attr("MINIMUM", None, DateTimeOrNumeric),
];

const PARAMETER: &[AttrSpec] = &[
    attr("LONG-NAME", None, ReferenceOrText),
    list("DIMENSION", Some(ReprCode::Uvari), Integer),
    list("AXIS", Some(ReprCode::Obname), Reference),
    list("ZONES", Some(ReprCode::Obname), Reference),
    grid("VALUES", None, Any),
];

const EQUIPMENT: &[AttrSpec] = &[
    attr("TRADEMARK-NAME", Some(ReprCode::Ascii), Text),
    attr("STATUS", Some(ReprCode::Status), Status),
    attr("TYPE", Some(ReprCode::Ident), Text),
    attr("SERIAL-NUMBER", Some(ReprCode::Ident), Text),
    attr("LOCATION", Some(ReprCode::Ident), Text),
    attr("HEIGHT", Some(ReprCode::Fdoubl), Numeric),
    attr("LENGTH", Some(ReprCode::Fdoubl), Numeric),
    attr("MINIMUM-DIAMETER", Some(ReprCode::Fdoubl), Numeric),
    attr("MAXIMUM-DIAMETER", Some(ReprCode::Fdoubl), Numeric),
    attr("VOLUME", Some(ReprCode::Fdoubl), Numeric),
    attr("WEIGHT", Some(ReprCode::Fdoubl), Numeric),
    attr("HOLE-SIZE", Some(ReprCode::Fdoubl), Numeric),
    attr("PRESSURE", Some(ReprCode::Fdoubl), Numeric),
    attr("TEMPERATURE", Some(ReprCode::Fdoubl), Numeric),
    attr("VERTICAL-DEPTH", Some(ReprCode::Fdoubl), Numeric),
    attr("RADIAL-DRIFT", Some(ReprCode::Fdoubl), Numeric),
    attr("ANGULAR-DRIFT", Some(ReprCode::Fdoubl), Numeric),
];

const TOOL: &[AttrSpec] = &[
    attr("DESCRIPTION", Some(ReprCode::Ascii), Text),
    attr("TRADEMARK-NAME", Some(ReprCode::Ascii), Text),
    attr("GENERIC-NAME", Some(ReprCode::Ascii), Text),
    list("PARTS", Some(ReprCode::Obname), Reference),
    attr("STATUS", Some(ReprCode::Status), Status),
    list("CHANNELS", Some(ReprCode::Obname), Reference),
    list("PARAMETERS", Some(ReprCode::Obname), Reference),
];

const COMPUTATION: &[AttrSpec] = &[
    attr("LONG-NAME", None, ReferenceOrText),
    list("PROPERTIES", Some(ReprCode::Ident), Text),
    list("DIMENSION", Some(ReprCode::Uvari), Integer),
    list("AXIS", Some(ReprCode::Obname), Reference),
    list("ZONES", Some(ReprCode::Obname), Reference),
    grid("VALUES", None, Numeric),
    attr("SOURCE", Some(ReprCode::Objref), ObjReference),
];

const PROCESS: &[AttrSpec] = &[
    attr("DESCRIPTION", Some(ReprCode::Ascii), Text),
    attr("TRADEMARK-NAME", Some(ReprCode::Ascii), Text),
    attr("VERSION", Some(ReprCode::Ascii), Text),
    list("PROPERTIES", Some(ReprCode::Ident), Text),
    attr("STATUS", Some(ReprCode::Ident), Text),
    list("INPUT-CHANNELS", Some(ReprCode::Obname), Reference),
    list("OUTPUT-CHANNELS", Some(ReprCode::Obname), Reference),
    list("INPUT-COMPUTATIONS", Some(ReprCode::Obname), Reference),
    list("OUTPUT-COMPUTATIONS", Some(ReprCode::Obname), Reference),
    list("PARAMETERS", Some(ReprCode::Obname), Reference),
    list("COMMENTS", Some(ReprCode::Ascii), Text),
];

const CALIBRATION: &[AttrSpec] = &[
    list("CALIBRATED-CHANNELS", Some(ReprCode::Obname), Reference),
    list("UNCALIBRATED-CHANNELS", Some(ReprCode::Obname), Reference),
    list("COEFFICIENTS", Some(ReprCode::Obname), Reference),
    list("MEASUREMENTS", Some(ReprCode::Obname), Reference),
    list("PARAMETERS", Some(ReprCode::Obname), Reference),
    attr("METHOD", Some(ReprCode::Ident), Text),
];

const CALIBRATION_MEASUREMENT: &[AttrSpec] = &[
    attr("PHASE", Some(ReprCode::Ident), Text),
    attr("MEASUREMENT-SOURCE", Some(ReprCode::Obname), Reference),
    attr("TYPE", Some(ReprCode::Ident), Text),
    list("DIMENSION", Some(ReprCode::Uvari), Integer),
    list("AXIS", Some(ReprCode::Obname), Reference),
    grid("MEASUREMENT", None, Numeric),
    attr("SAMPLE-COUNT", None, Integer),
    grid("MAXIMUM-DEVIATION", None, Numeric),
    grid("STANDARD-DEVIATION", None, Numeric),
    attr("BEGIN-TIME", None, DateTimeOrNumeric),
    attr("DURATION", None, Numeric),
    grid("REFERENCE", None, Numeric),
    grid("STANDARD", None, Numeric),
    grid("PLUS-TOLERANCE", None, Numeric),
    grid("MINUS-TOLERANCE", None, Numeric),
];

const CALIBRATION_COEFFICIENT: &[AttrSpec] = &[
    attr("LABEL", Some(ReprCode::Ident), Text),
    list("COEFFICIENTS", None, Numeric),
    list("REFERENCES", None, Numeric),
    list("PLUS-TOLERANCES", None, Numeric),
    list("MINUS-TOLERANCES", None, Numeric),
];

const GROUP: &[AttrSpec] = &[
    attr("DESCRIPTION", Some(ReprCode::Ascii), Text),
    attr("OBJECT-TYPE", Some(ReprCode::Ident), Text),
    list("OBJECT-LIST", Some(ReprCode::Objref), ObjReference),
    list("GROUP-LIST", Some(ReprCode::Obname), Reference),
];

const SPLICE: &[AttrSpec] = &[
    attr("OUTPUT-CHANNEL", Some(ReprCode::Obname), Reference),
    list("INPUT-CHANNELS", Some(ReprCode::Obname), Reference),
    list("ZONES", Some(ReprCode::Obname), Reference),
];

const PATH: &[AttrSpec] = &[
    attr("FRAME-TYPE", Some(ReprCode::Obname), Reference),
    attr("WELL-REFERENCE-POINT", Some(ReprCode::Obname), Reference),
    list("VALUE", Some(ReprCode::Obname), Reference),
    attr("BOREHOLE-DEPTH", None, Numeric),
    attr("VERTICAL-DEPTH", None, Numeric),
    attr("RADIAL-DRIFT", None, Numeric),
    attr("ANGULAR-DRIFT", None, Numeric),
    attr("TIME", None, Numeric),
    attr("DEPTH-OFFSET", None, Numeric),
    attr("MEASURE-POINT-OFFSET", None, Numeric),
    attr("TOOL-ZERO-OFFSET", None, Numeric),
];

const WELL_REFERENCE_POINT: &[AttrSpec] = &[
    attr("PERMANENT-DATUM", Some(ReprCode::Ascii), Text),
    attr("VERTICAL-ZERO", Some(ReprCode::Ascii), Text),
    attr("PERMANENT-DATUM-ELEVATION", Some(ReprCode::Fdoubl), Numeric),
    attr("ABOVE-PERMANENT-DATUM", Some(ReprCode::Fdoubl), Numeric),
    attr("MAGNETIC-DECLINATION", Some(ReprCode::Fdoubl), Numeric),
    attr("COORDINATE-1-NAME", Some(ReprCode::Ascii), Text),
    attr("COORDINATE-1-VALUE", Some(ReprCode::Fdoubl), Numeric),
    attr("COORDINATE-2-NAME", Some(ReprCode::Ascii), Text),
    attr("COORDINATE-2-VALUE", Some(ReprCode::Fdoubl), Numeric),
    attr("COORDINATE-3-NAME", Some(ReprCode::Ascii), Text),
    attr("COORDINATE-3-VALUE", Some(ReprCode::Fdoubl), Numeric),
];

const LONG_NAME: &[AttrSpec] = &[
    list("GENERAL-MODIFIER", Some(ReprCode::Ascii), Text),
    attr("QUANTITY", Some(ReprCode::Ascii), Text),
    list("QUANTITY-MODIFIER", Some(ReprCode::Ascii), Text),
    attr("ALTERED-FORM", Some(ReprCode::Ascii), Text),
    attr("ENTITY", Some(ReprCode::Ascii), Text),
    list("ENTITY-MODIFIER", Some(ReprCode::Ascii), Text),
    attr("ENTITY-NUMBER", Some(ReprCode::Ascii), Text),
    attr("ENTITY-PART", Some(ReprCode::Ascii), Text),
    attr("ENTITY-PART-NUMBER", Some(ReprCode::Ascii), Text),
    attr("GENERIC-SOURCE", Some(ReprCode::Ascii), Text),
    list("SOURCE-PART", Some(ReprCode::Ascii), Text),
    list("SOURCE-PART-NUMBER", Some(ReprCode::Ascii), Text),
    list("CONDITIONS", Some(ReprCode::Ascii), Text),
    attr("STANDARD-SYMBOL", Some(ReprCode::Ascii), Text),
    attr("PRIVATE-SYMBOL", Some(ReprCode::Ascii), Text),
];

const MESSAGE: &[AttrSpec] = &[
    attr("TYPE", Some(ReprCode::Ident), Text),
    attr("TIME", None, DateTimeOrNumeric),
    attr("BOREHOLE-DRIFT", None, Numeric),
    attr("VERTICAL-DEPTH", None, Numeric),
    attr("RADIAL-DRIFT", None, Numeric),
    attr("ANGULAR-DRIFT", None, Numeric),
    list("TEXT", Some(ReprCode::Ascii), Text),
];

const COMMENT: &[AttrSpec] = &[list("TEXT", Some(ReprCode::Ascii), Text)];

const NO_FORMAT: &[AttrSpec] = &[
    attr("CONSUMER-NAME", Some(ReprCode::Ident), Text),
    attr("DESCRIPTION", Some(ReprCode::Ascii), Text),
];

impl SetKind {
    /// Returns the set type string written in the set component.
    pub fn set_type(self) -> &'static str {
        match self {
            SetKind::Origin => "ORIGIN",
            SetKind::Axis => "AXIS",
            SetKind::Channel => "CHANNEL",
            SetKind::Frame => "FRAME",
            SetKind::Zone => "ZONE",
            SetKind::Parameter => "PARAMETER",
            SetKind::Equipment => "EQUIPMENT",
            SetKind::Tool => "TOOL",
            SetKind::Computation => "COMPUTATION",
            SetKind::Process => "PROCESS",
            SetKind::Calibration => "CALIBRATION",
            SetKind::CalibrationMeasurement => "CALIBRATION-MEASUREMENT",
            SetKind::CalibrationCoefficient => "CALIBRATION-COEFFICIENT",
            SetKind::Group => "GROUP",
            SetKind::Splice => "SPLICE",
            SetKind::Path => "PATH",
            SetKind::WellReferencePoint => "WELL-REFERENCE",
            SetKind::LongName => "LONG-NAME",
            SetKind::Message => "MESSAGE",
            SetKind::Comment => "COMMENT",
            SetKind::NoFormat => "NO-FORMAT",
        }
    }

    /// Returns the logical record type code for sets of this kind.
    pub fn record_type(self) -> u8 {
        match self {
            SetKind::Origin => eflr_type::OLR,
            SetKind::Axis => eflr_type::AXIS,
            SetKind::Channel => eflr_type::CHANNL,
            SetKind::Frame | SetKind::Path => eflr_type::FRAME,
            SetKind::Zone
            | SetKind::Parameter
            | SetKind::Equipment
            | SetKind::Tool
            | SetKind::Computation
            | SetKind::Process
            | SetKind::Calibration
            | SetKind::CalibrationMeasurement
            | SetKind::CalibrationCoefficient
            | SetKind::Group
            | SetKind::Splice => eflr_type::STATIC,
            SetKind::WellReferencePoint => eflr_type::OLR,
            SetKind::LongName => eflr_type::LNAME,
            SetKind::Message | SetKind::Comment => eflr_type::SCRIPT,
            SetKind::NoFormat => eflr_type::UDI,
        }
    }

    /// Returns the ordered attribute catalog of this kind.
    pub fn attributes(self) -> &'static [AttrSpec] {
        match self {
            SetKind::Origin => ORIGIN,
            SetKind::Axis => AXIS,
            SetKind::Channel => CHANNEL,
            SetKind::Frame => FRAME,
            SetKind::Zone => ZONE,
            SetKind::Parameter => PARAMETER,
            SetKind::Equipment => EQUIPMENT,
            SetKind::Tool => TOOL,
            SetKind::Computation => COMPUTATION,
            SetKind::Process => PROCESS,
            SetKind::Calibration => CALIBRATION,
            SetKind::CalibrationMeasurement => CALIBRATION_MEASUREMENT,
            SetKind::CalibrationCoefficient => CALIBRATION_COEFFICIENT,
            SetKind::Group => GROUP,
            SetKind::Splice => SPLICE,
            SetKind::Path => PATH,
            SetKind::WellReferencePoint => WELL_REFERENCE_POINT,
            SetKind::LongName => LONG_NAME,
            SetKind::Message => MESSAGE,
            SetKind::Comment => COMMENT,
            SetKind::NoFormat => NO_FORMAT,
        }
    }

    /// Looks up the catalog entry with the given label.
    pub fn attribute(self, label: &str) -> Option<&'static AttrSpec> {
        self.attributes().iter().find(|spec| spec.label == label)
    }
}

/// The frame index types defined by the standard.
pub const FRAME_INDEX_TYPES: &[&str] = &[
    "ANGULAR-DRIFT",
    "BOREHOLE-DEPTH",
    "NON-STANDARD",
    "RADIAL-DRIFT",
    "TIME",
    "VERTICAL-DEPTH",
];
