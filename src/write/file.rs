//! The logical-file model root and the file driver.

use std::path::Path;

use rand::Rng;

use crate::codec::{ReprCode, Scalar};
use crate::error::{Error, Result};
use crate::model::{FileHeader, Item, Set, SetKind, Values, FRAME_INDEX_TYPES};
use crate::rp66::{iflr_type, uvari, visible_record};
use crate::write::frame_data::{FrameStream, NoFormatData};
use crate::write::output::{BufferedOutput, ByteWriter};
use crate::write::segment::LogicalRecord;
use crate::write::sul::StorageUnitLabel;

/// Configuration of the file driver.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Maximum length of a visible record; even, within `20..=16384`.
    pub visible_record_length: u32,
    /// Capacity of the output buffer in bytes.
    pub output_chunk_size: u64,
    /// Stricter validation for consumers that reject otherwise legal
    /// files: restricted item names, hard failures instead of warnings,
    /// and a small sequential default file set number.
    pub high_compatibility_mode: bool,
}

impl Default for WriterConfig {
    fn default() -> WriterConfig {
        WriterConfig {
            visible_record_length: 8192,
            output_chunk_size: 1 << 32,
            high_compatibility_mode: false,
        }
    }
}

impl WriterConfig {
    fn validate(&self) -> Result<()> {
        let vrl = self.visible_record_length;
        if !(visible_record::MIN_LENGTH..=visible_record::MAX_LENGTH).contains(&vrl) {
            return Err(Error::segmentation(format!(
                "visible record length must be within {}..={}; got {vrl}",
                visible_record::MIN_LENGTH,
                visible_record::MAX_LENGTH,
            )));
        }
        if vrl % 2 != 0 {
            return Err(Error::segmentation(format!(
                "visible record length must be even; got {vrl}"
            )));
        }
        if self.output_chunk_size < vrl.into() {
            return Err(Error::validation(format!(
                "output chunk size {} is smaller than the visible record \
                 length {vrl}",
                self.output_chunk_size,
            )));
        }
        Ok(())
    }

    /// The largest segment body the configuration allows: one visible
    /// record header and one segment header are reserved.
    fn max_segment_body(&self) -> usize {
        self.visible_record_length as usize - 8
    }
}

/// The in-memory description of one logical file.
///
/// A logical file starts with a file header and at least one origin; the
/// remaining sets keep the order in which they were added, which is also
/// the order their records appear in the file.
#[derive(Debug)]
pub struct LogicalFile {
    storage_set_identifier: String,
    sul_sequence_number: u32,
    file_header: FileHeader,
    origins: Set,
    sets: Vec<Set>,
    no_format_data: Vec<NoFormatData>,
}

impl LogicalFile {
    /// Creates a logical file from its file header and defining origin.
    pub fn new(file_header: FileHeader, defining_origin: Item) -> Result<LogicalFile> {
        let mut origins = Set::new(SetKind::Origin, None);
        origins.add_item(defining_origin)?;
        Ok(LogicalFile {
            storage_set_identifier: "DEFAULT STORAGE SET".into(),
            sul_sequence_number: 1,
            file_header,
            origins,
            sets: Vec::new(),
            no_format_data: Vec::new(),
        })
    }

    /// Returns the file header.
    pub fn file_header(&self) -> &FileHeader {
        &self.file_header
    }

    /// Returns the primary origin set.
    pub fn origins(&self) -> &Set {
        &self.origins
    }

    /// Returns the defining origin: the first origin added.
    pub fn defining_origin(&self) -> &Item {
        self.origins.items().next().expect("constructor adds one")
    }

    /// Adds an origin to the primary origin set.
    pub fn add_origin(&mut self, origin: Item) -> Result<()> {
        self.origins.add_item(origin)
    }

    /// Adds a set. Set identities `(kind, set name)` must be unique.
    pub fn add_set(&mut self, set: Set) -> Result<()> {
        let exists = self
            .sets
            .iter()
            .any(|s| s.kind() == set.kind() && s.set_name() == set.set_name())
            || (set.kind() == SetKind::Origin && set.set_name().is_none());
        if exists {
            return Err(Error::validation(format!(
                "a {} set named {:?} already exists",
                set.kind().set_type(),
                set.set_name(),
            )));
        }
        self.sets.push(set);
        Ok(())
    }

    /// Returns the added sets in insertion order.
    pub fn sets(&self) -> &[Set] {
        &self.sets
    }

    /// Adds a no-format data record.
    pub fn add_no_format_data(&mut self, record: NoFormatData) {
        self.no_format_data.push(record);
    }

    /// Sets the storage set identifier written in the Storage Unit Label.
    pub fn set_storage_set_identifier(&mut self, identifier: impl Into<String>) {
        self.storage_set_identifier = identifier.into();
    }

    /// Sets the sequence number written in the Storage Unit Label.
    pub fn set_sul_sequence_number(&mut self, sequence_number: u32) {
        self.sul_sequence_number = sequence_number;
    }

    fn items_of_kind(&self, kind: SetKind) -> impl Iterator<Item = &Item> {
        self.sets
            .iter()
            .filter(move |set| set.kind() == kind)
            .flat_map(Set::items)
    }

    /// Reads the defining origin's file set number, if one was assigned.
    fn file_set_number(&self) -> Result<Option<u32>> {
        let attr = match self.defining_origin().attribute("FILE-SET-NUMBER") {
            Some(attr) => attr,
            None => return Ok(None),
        };
        let value = match attr.value() {
            Some(Values::Scalar(Scalar::Int(v))) => *v,
            Some(other) => {
                return Err(Error::validation(format!(
                    "FILE-SET-NUMBER must be a single integer; got {other:?}"
                )))
            }
            None => return Ok(None),
        };
        let value = u32::try_from(value)
            .ok()
            .filter(|v| (1..=uvari::MAX).contains(v))
            .ok_or_else(|| {
                Error::validation(format!(
                    "FILE-SET-NUMBER {value} is outside the UVARI range 1..={}",
                    uvari::MAX,
                ))
            })?;
        Ok(Some(value))
    }
}

/// The file driver: validates a logical file, orders its records, and
/// streams them to disk.
#[derive(Debug)]
pub struct Writer {
    config: WriterConfig,
}

impl Writer {
    /// Creates a driver with the given configuration.
    pub fn new(config: WriterConfig) -> Writer {
        Writer { config }
    }

    /// Writes the logical file and its frame data to `path`, returning
    /// the total number of bytes written.
    ///
    /// Validation failures surface before the destination is touched.
    /// Encoding or I/O failures mid-write leave a truncated file behind;
    /// removing it is the caller's responsibility.
    pub fn write(
        &self,
        mut file: LogicalFile,
        mut streams: Vec<FrameStream<'_>>,
        path: impl AsRef<Path>,
    ) -> Result<u64> {
        let path = path.as_ref();
        self.config.validate()?;
        validate_model(&file, &streams, self.config.high_compatibility_mode)?;

        let default_origin = self.resolve_file_set_number(&mut file)?;
        apply_origin_defaults(&mut file);
        file.file_header.resolve_origin(default_origin);
        file.origins.resolve_origin(default_origin);
        for set in &mut file.sets {
            set.resolve_origin(default_origin);
        }
        for record in &mut file.no_format_data {
            record.resolve_origin(default_origin);
        }
        for stream in &mut streams {
            stream.resolve_origin(default_origin);
        }

        let sul = StorageUnitLabel::new(
            file.storage_set_identifier.clone(),
            file.sul_sequence_number,
            self.config.visible_record_length,
        )?;

        log::info!("writing DLIS file to {}", path.display());
        let mut writer = ByteWriter::create(path)?;
        writer.write_bytes(&sul.bytes()?)?;
        let mut out = BufferedOutput::new(
            usize::try_from(self.config.output_chunk_size).unwrap_or(usize::MAX),
            writer,
        );
        let mut vr = VisibleRecordBuilder::new(self.config.visible_record_length);
        let mut records = 0u64;

        let body = file.file_header.body_bytes()?;
        self.emit(
            LogicalRecord::new(body, file.file_header.record_type(), true),
            &mut vr,
            &mut out,
        )?;
        records += 1;

        self.emit_set(&file.origins, &mut vr, &mut out, &mut records)?;
        for set in file.sets.iter().filter(|s| s.kind() == SetKind::Origin) {
            self.emit_set(set, &mut vr, &mut out, &mut records)?;
        }
        for set in file.sets.iter().filter(|s| s.kind() != SetKind::Origin) {
            self.emit_set(set, &mut vr, &mut out, &mut records)?;
        }

        for record in &file.no_format_data {
            self.emit(
                LogicalRecord::new(record.body_bytes()?, iflr_type::NOFMT, false),
                &mut vr,
                &mut out,
            )?;
            records += 1;
        }

        // One stream per frame, in the order the frames were added.
        for frame in file.items_of_kind(SetKind::Frame) {
            let stream = streams
                .iter()
                .find(|stream| stream.frame().name == frame.name())
                .ok_or_else(|| {
                    Error::validation(format!(
                        "frame {:?} has no frame data stream",
                        frame.name(),
                    ))
                })?;
            log::debug!(
                "writing {} frame data records for frame {:?}",
                stream.row_count(),
                frame.name(),
            );
            for body in stream.record_bodies() {
                self.emit(
                    LogicalRecord::new(body?, iflr_type::FDATA, false),
                    &mut vr,
                    &mut out,
                )?;
                records += 1;
            }
        }

        vr.flush(&mut out)?;
        let writer = out.finish()?;
        let total = writer.total_size();
        log::info!(
            "{records} logical records written to {}; total file size {total} bytes",
            path.display(),
        );
        Ok(total)
    }

    fn resolve_file_set_number(&self, file: &mut LogicalFile) -> Result<u32> {
        if let Some(value) = file.file_set_number()? {
            return Ok(value);
        }
        let value = if self.config.high_compatibility_mode {
            // Some consumers choke on large file set numbers; a small
            // sequential value sidesteps that.
            1
        } else {
            rand::rng().random_range(1..=uvari::MAX)
        };
        log::info!("defaulting the file set number to {value}");
        let defining = file
            .origins
            .items_mut()
            .next()
            .expect("constructor adds one");
        defining
            .set("FILE-SET-NUMBER", i64::from(value))
            .set_code(ReprCode::Uvari);
        Ok(value)
    }

    fn emit_set(
        &self,
        set: &Set,
        vr: &mut VisibleRecordBuilder,
        out: &mut BufferedOutput,
        records: &mut u64,
    ) -> Result<()> {
        if set.is_empty() {
            log::warn!(
                "skipping empty {} set {:?}",
                set.kind().set_type(),
                set.set_name(),
            );
            return Ok(());
        }
        log::debug!(
            "writing {} set {:?} with {} items",
            set.kind().set_type(),
            set.set_name(),
            set.len(),
        );
        self.emit(
            LogicalRecord::new(set.body_bytes()?, set.record_type(), true),
            vr,
            out,
        )?;
        *records += 1;
        Ok(())
    }

    fn emit(
        &self,
        record: LogicalRecord,
        vr: &mut VisibleRecordBuilder,
        out: &mut BufferedOutput,
    ) -> Result<()> {
        for segment in record.segments(self.config.max_segment_body())? {
            vr.push_segment(&segment, out)?;
        }
        Ok(())
    }
}

/// Packs consecutive segments greedily into visible records.
#[derive(Debug)]
struct VisibleRecordBuilder {
    length: usize,
    body: Vec<u8>,
}

impl VisibleRecordBuilder {
    fn new(length: u32) -> VisibleRecordBuilder {
        VisibleRecordBuilder {
            length: length as usize,
            body: Vec::new(),
        }
    }

    fn push_segment(&mut self, segment: &[u8], out: &mut BufferedOutput) -> Result<()> {
        if visible_record::HEADER_SIZE + self.body.len() + segment.len() > self.length {
            self.flush(out)?;
        }
        debug_assert!(visible_record::HEADER_SIZE + segment.len() <= self.length);
        self.body.extend_from_slice(segment);
        Ok(())
    }

    fn flush(&mut self, out: &mut BufferedOutput) -> Result<()> {
        if self.body.is_empty() {
            return Ok(());
        }
        let total = visible_record::HEADER_SIZE + self.body.len();
        out.add_bytes(&(total as u16).to_be_bytes())?;
        out.add_bytes(&visible_record::FORMAT_VERSION)?;
        out.add_bytes(&self.body)?;
        self.body.clear();
        Ok(())
    }
}

fn validate_model(
    file: &LogicalFile,
    streams: &[FrameStream<'_>],
    high_compat: bool,
) -> Result<()> {
    let channels: Vec<&Item> = file.items_of_kind(SetKind::Channel).collect();
    if channels.is_empty() {
        return Err(Error::validation("no channels defined for the file"));
    }
    let frames: Vec<&Item> = file.items_of_kind(SetKind::Frame).collect();
    if frames.is_empty() {
        return Err(Error::validation("no frames defined for the file"));
    }

    let mut frame_names = Vec::new();
    for frame in &frames {
        if frame_names.contains(&frame.name()) {
            return Err(Error::validation(format!(
                "two frames named {:?}; frame data streams cannot be bound \
                 unambiguously",
                frame.name(),
            )));
        }
        frame_names.push(frame.name());
    }
    for stream in streams {
        if !frame_names.contains(&stream.frame().name.as_str()) {
            return Err(Error::validation(format!(
                "frame data stream references unknown frame {:?}",
                stream.frame().name,
            )));
        }
    }

    let mut framed_channels: Vec<String> = Vec::new();
    for frame in &frames {
        let stream = match streams
            .iter()
            .find(|stream| stream.frame().name == frame.name())
        {
            Some(stream) => stream,
            None => {
                return Err(Error::validation(format!(
                    "frame {:?} has no frame data stream",
                    frame.name(),
                )))
            }
        };
        validate_frame(frame, stream, &channels)?;
        framed_channels.extend(
            stream
                .bindings()
                .iter()
                .map(|binding| binding.channel.name.clone()),
        );
    }

    for channel in &channels {
        validate_channel_limits(channel)?;
        if !framed_channels.iter().any(|name| name == channel.name()) {
            if high_compat {
                return Err(Error::validation(format!(
                    "channel {:?} is not referenced by any frame",
                    channel.name(),
                )));
            }
            log::warn!(
                "channel {:?} is not referenced by any frame; some consumers \
                 reject such files",
                channel.name(),
            );
        }
    }

    for record in &file.no_format_data {
        let target = &record.target().name;
        if !file
            .items_of_kind(SetKind::NoFormat)
            .any(|item| item.name() == target)
        {
            return Err(Error::validation(format!(
                "no-format data references undefined NO-FORMAT item {target:?}"
            )));
        }
    }

    if high_compat {
        let all_names = file
            .origins
            .items()
            .chain(file.sets.iter().flat_map(Set::items))
            .map(Item::name);
        for name in all_names {
            let ok = !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_' || c == '-');
            if !ok {
                return Err(Error::validation(format!(
                    "item name {name:?} is not allowed in high-compatibility \
                     mode; use A-Z, 0-9, dashes, and underscores"
                )));
            }
        }
    }
    Ok(())
}

fn int_list(item: &Item, label: &str) -> Option<Vec<i64>> {
    let values = item.attribute(label)?.value()?;
    values
        .flattened()
        .map(|scalar| match scalar {
            Scalar::Int(v) => Some(*v),
            _ => None,
        })
        .collect()
}

fn validate_channel_limits(channel: &Item) -> Result<()> {
    let dimension = match int_list(channel, "DIMENSION") {
        Some(dimension) => dimension,
        None => return Ok(()),
    };
    if dimension.iter().any(|&d| d < 1) {
        return Err(Error::validation(format!(
            "channel {:?} has non-positive DIMENSION {dimension:?}",
            channel.name(),
        )));
    }
    if let Some(limit) = int_list(channel, "ELEMENT-LIMIT") {
        let fits = limit.len() == dimension.len()
            && dimension.iter().zip(&limit).all(|(d, l)| d <= l);
        if !fits {
            return Err(Error::validation(format!(
                "channel {:?} has ELEMENT-LIMIT {limit:?} smaller than its \
                 DIMENSION {dimension:?}",
                channel.name(),
            )));
        }
    }
    Ok(())
}

fn validate_frame(frame: &Item, stream: &FrameStream<'_>, channels: &[&Item]) -> Result<()> {
    if let Some(index_type) = frame.attribute("INDEX-TYPE").and_then(|a| a.value()) {
        match index_type {
            Values::Scalar(Scalar::Str(s)) if FRAME_INDEX_TYPES.contains(&s.as_str()) => {}
            other => {
                return Err(Error::validation(format!(
                    "frame {:?} has invalid INDEX-TYPE {other:?}",
                    frame.name(),
                )))
            }
        }
    }

    let channel_refs: Vec<&str> = match frame.attribute("CHANNELS").and_then(|a| a.value()) {
        Some(values) => values
            .flattened()
            .map(|scalar| match scalar {
                Scalar::Name(name) => Ok(name.name.as_str()),
                other => Err(Error::validation(format!(
                    "CHANNELS of frame {:?} must hold object names; got {other:?}",
                    frame.name(),
                ))),
            })
            .collect::<Result<_>>()?,
        None => {
            return Err(Error::validation(format!(
                "frame {:?} has no CHANNELS",
                frame.name(),
            )))
        }
    };
    if channel_refs.is_empty() {
        return Err(Error::validation(format!(
            "frame {:?} references no channels",
            frame.name(),
        )));
    }

    let bound: Vec<&str> = stream
        .bindings()
        .iter()
        .map(|binding| binding.channel.name.as_str())
        .collect();
    if channel_refs != bound {
        return Err(Error::validation(format!(
            "frame {:?} lists channels {channel_refs:?}, but its stream \
             binds {bound:?}",
            frame.name(),
        )));
    }

    stream.validate_against_source()?;

    for binding in stream.bindings() {
        let channel = channels
            .iter()
            .find(|channel| channel.name() == binding.channel.name)
            .ok_or_else(|| {
                Error::validation(format!(
                    "frame {:?} references undefined channel {:?}",
                    frame.name(),
                    binding.channel.name,
                ))
            })?;

        if let Some(Values::Scalar(Scalar::Int(code))) = channel
            .attribute("REPRESENTATION-CODE")
            .and_then(|a| a.value())
        {
            if *code != i64::from(binding.code.tag()) {
                return Err(Error::validation(format!(
                    "channel {:?} declares representation code {code}, but \
                     its stream binding uses {}",
                    channel.name(),
                    binding.code.tag(),
                )));
            }
        }

        if let Some(declared) = int_list(channel, "DIMENSION") {
            let bound: Vec<i64> = binding.dimension.iter().map(|&d| d as i64).collect();
            if declared != bound {
                return Err(Error::validation(format!(
                    "channel {:?} declares dimension {declared:?}, but its \
                     stream binding uses {bound:?}",
                    channel.name(),
                )));
            }
        }
    }
    Ok(())
}

fn apply_origin_defaults(file: &mut LogicalFile) {
    let now = chrono::Local::now().naive_local();
    for origin in file.origins.items_mut() {
        if origin
            .attribute("CREATION-TIME")
            .and_then(|a| a.value())
            .is_none()
        {
            origin.set("CREATION-TIME", now);
        }
        if origin
            .attribute("FIELD-NAME")
            .and_then(|a| a.value())
            .is_none()
        {
            // RP66 names WILDCAT as the field name of an unknown field.
            origin.set("FIELD-NAME", "WILDCAT");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ReprCode;
    use crate::source::{ColumnSource, Samples};
    use crate::write::frame_data::ChannelBinding;

    fn minimal_file() -> LogicalFile {
        let mut origin = Item::new("O1");
        origin.set("FILE-SET-NUMBER", 1i64);

        let mut channel = Item::new("C");
        channel.set("REPRESENTATION-CODE", i64::from(ReprCode::Fdoubl.tag()));
        channel.set("DIMENSION", vec![1i64]);

        let mut frame = Item::new("F");
        frame.set("INDEX-TYPE", "TIME");
        frame.set("CHANNELS", Values::from(vec![channel.reference()]));

        let mut channels = Set::new(SetKind::Channel, None);
        channels.add_item(channel).unwrap();
        let mut frames = Set::new(SetKind::Frame, None);
        frames.add_item(frame).unwrap();

        let mut file =
            LogicalFile::new(FileHeader::new("FILE", 1).unwrap(), origin).unwrap();
        file.add_set(channels).unwrap();
        file.add_set(frames).unwrap();
        file
    }

    fn minimal_source() -> ColumnSource {
        let mut source = ColumnSource::new();
        source
            .add_column("c", Samples::F64(vec![1.0, 2.0, 3.0]), vec![1])
            .unwrap();
        source
    }

    fn minimal_stream(source: &ColumnSource) -> FrameStream<'_> {
        FrameStream::new(
            "F",
            vec![ChannelBinding::scalar("C", "c", ReprCode::Fdoubl)],
            source,
        )
    }

    #[test]
    fn config_bounds() {
        let mut config = WriterConfig::default();
        config.validate().unwrap();
        config.visible_record_length = 8191;
        assert!(config.validate().is_err());
        config.visible_record_length = 18;
        assert!(config.validate().is_err());
        config.visible_record_length = 16386;
        assert!(config.validate().is_err());
        config.visible_record_length = 8192;
        config.output_chunk_size = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_channels_or_frames_rejected() {
        let mut origin = Item::new("O1");
        origin.set("FILE-SET-NUMBER", 1i64);
        let file = LogicalFile::new(FileHeader::new("F", 1).unwrap(), origin).unwrap();
        let err = validate_model(&file, &[], false).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn frame_without_stream_rejected() {
        let file = minimal_file();
        let err = validate_model(&file, &[], false).unwrap_err();
        assert!(err.to_string().contains("no frame data stream"));
    }

    #[test]
    fn stream_channel_order_must_match_the_frame() {
        let file = minimal_file();
        let source = minimal_source();
        let stream = FrameStream::new(
            "F",
            vec![ChannelBinding::scalar("OTHER", "c", ReprCode::Fdoubl)],
            &source,
        );
        let err = validate_model(&file, &[stream], false).unwrap_err();
        assert!(err.to_string().contains("binds"));
    }

    #[test]
    fn declared_code_must_match_the_binding() {
        let file = minimal_file();
        let source = minimal_source();
        let stream = FrameStream::new(
            "F",
            vec![ChannelBinding::scalar("C", "c", ReprCode::Fsingl)],
            &source,
        );
        let err = validate_model(&file, &[stream], false).unwrap_err();
        assert!(err.to_string().contains("representation code"));
    }

    #[test]
    fn unframed_channel_is_fatal_in_high_compat_mode() {
        let mut file = minimal_file();
        let mut extra = Set::new(SetKind::Channel, Some("EXTRA"));
        extra.add_item(Item::new("UNUSED")).unwrap();
        file.add_set(extra).unwrap();
        let source = minimal_source();

        validate_model(&file, &[minimal_stream(&source)], false).unwrap();
        let err = validate_model(&file, &[minimal_stream(&source)], true).unwrap_err();
        assert!(err.to_string().contains("not referenced"));
    }

    #[test]
    fn high_compat_restricts_item_names() {
        let mut file = minimal_file();
        let mut zones = Set::new(SetKind::Zone, None);
        zones.add_item(Item::new("zone one")).unwrap();
        file.add_set(zones).unwrap();
        let source = minimal_source();

        validate_model(&file, &[minimal_stream(&source)], false).unwrap();
        let err = validate_model(&file, &[minimal_stream(&source)], true).unwrap_err();
        assert!(err.to_string().contains("high-compatibility"));
    }

    #[test]
    fn duplicate_set_identity_rejected() {
        let mut file = minimal_file();
        let dup = Set::new(SetKind::Channel, None);
        assert!(file.add_set(dup).is_err());
        file.add_set(Set::new(SetKind::Channel, Some("B"))).unwrap();
    }

    #[test]
    fn file_set_number_range_checked() {
        let mut origin = Item::new("O1");
        origin.set("FILE-SET-NUMBER", i64::from(u32::MAX));
        let file = LogicalFile::new(FileHeader::new("F", 1).unwrap(), origin).unwrap();
        assert!(file.file_set_number().is_err());
    }
}
