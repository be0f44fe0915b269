//! GDS-II binary stream reader and writer.
//!
//! GDS-II (Graphic Data System II) is the exchange format fabs and layout
//! viewers consume. A component tree is written as one structure per distinct
//! component, children before parents, so that every SREF/AREF points at a
//! structure already defined.
//!
//! ## GDS-II Record Structure
//! Each record: [2-byte length][2-byte record type][payload]
//! Record types define the hierarchy: BGNLIB, BGNSTR, BOUNDARY/SREF/AREF, ENDSTR, ENDLIB

use std::collections::{HashMap, HashSet};
use std::io::{self, Read, Seek};
use std::sync::Arc;

use padkit_core::{
    ArrayPlacement, BBox, Component, ComponentId, ComponentRef, GeomPrimitive, LayerId, Point,
    Polygon, Rect, Transform,
};
use thiserror::Error;

// ── GDS-II Record Types ──────────────────────────────────────────────

#[allow(dead_code)]
mod record_type {
    pub const HEADER: u16     = 0x0002;
    pub const BGNLIB: u16     = 0x0102;
    pub const LIBNAME: u16    = 0x0206;
    pub const UNITS: u16      = 0x0305;
    pub const ENDLIB: u16     = 0x0400;
    pub const BGNSTR: u16     = 0x0502;
    pub const STRNAME: u16    = 0x0606;
    pub const ENDSTR: u16     = 0x0700;
    pub const BOUNDARY: u16   = 0x0800;
    pub const PATH: u16       = 0x0900;
    pub const SREF: u16       = 0x0A00;
    pub const AREF: u16       = 0x0B00;
    pub const TEXT: u16       = 0x0C00;
    pub const LAYER: u16      = 0x0D02;
    pub const DATATYPE: u16   = 0x0E02;
    pub const WIDTH: u16      = 0x0F03;
    pub const XY: u16         = 0x1003;
    pub const ENDEL: u16      = 0x1100;
    pub const SNAME: u16      = 0x1206;
    pub const COLROW: u16     = 0x1302;
    pub const NODE: u16       = 0x1500;
    pub const TEXTTYPE: u16   = 0x1602;
    pub const STRANS: u16     = 0x1A01;
    pub const MAG: u16        = 0x1B05;
    pub const ANGLE: u16      = 0x1C05;
    pub const BOX: u16        = 0x2D00;
    pub const BOXTYPE: u16    = 0x2E02;
}

/// STRANS bit for reflection about the x axis.
const STRANS_REFLECT: u16 = 0x8000;

/// Modification and access time written to BGNLIB/BGNSTR. Fixed so that
/// identical components give byte-identical files.
const TIMESTAMP: [i16; 12] = [2024, 1, 1, 0, 0, 0, 2024, 1, 1, 0, 0, 0];

// ── Errors ────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum GdsError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid GDS-II record at offset {offset}: {message}")]
    InvalidRecord { offset: u64, message: String },

    #[error("Unexpected record type 0x{record_type:04X}, expected 0x{expected:04X}")]
    UnexpectedRecord { record_type: u16, expected: u16 },

    #[error("Invalid coordinate data")]
    InvalidCoordinates,

    #[error("Array dimension {0} does not fit a COLROW record")]
    ArrayTooLarge(usize),

    #[error("Cell '{0}' referenced but not defined")]
    UndefinedCell(String),

    #[error("Cell '{0}' references itself")]
    RecursiveCell(String),

    #[error("Library contains no cells")]
    EmptyLibrary,
}

// ── GDS-II Record ─────────────────────────────────────────────────────

#[derive(Debug)]
struct GdsRecord {
    record_type: u16,
    data: Vec<u8>,
}

impl GdsRecord {
    fn as_i16_vec(&self) -> Vec<i16> {
        self.data
            .chunks_exact(2)
            .map(|c| i16::from_be_bytes([c[0], c[1]]))
            .collect()
    }

    fn as_i32_vec(&self) -> Vec<i32> {
        self.data
            .chunks_exact(4)
            .map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }

    /// Payload as ASCII, NUL padding stripped.
    fn as_string(&self) -> String {
        let s: String = self.data.iter().map(|&b| b as char).collect();
        s.trim_end_matches('\0').to_string()
    }

    /// Payload as GDS-II 8-byte reals (excess-64 floating point).
    fn as_f64_vec(&self) -> Vec<f64> {
        self.data
            .chunks_exact(8)
            .map(|c| {
                let mut bytes = [0u8; 8];
                bytes.copy_from_slice(c);
                gds_real8_to_f64(&bytes)
            })
            .collect()
    }

    fn first_i16(&self) -> Option<i16> {
        self.as_i16_vec().first().copied()
    }
}

/// Convert GDS-II excess-64 real format to IEEE 754 f64.
fn gds_real8_to_f64(bytes: &[u8; 8]) -> f64 {
    if bytes.iter().all(|&b| b == 0) {
        return 0.0;
    }

    let sign = if bytes[0] & 0x80 != 0 { -1.0 } else { 1.0 };
    let exponent = (bytes[0] & 0x7F) as i32 - 64;

    let mut mantissa: u64 = 0;
    for &b in &bytes[1..] {
        mantissa = (mantissa << 8) | (b as u64);
    }

    let mantissa_f = mantissa as f64 / (1u64 << 56) as f64;
    sign * mantissa_f * 16.0_f64.powi(exponent)
}

/// Convert IEEE 754 f64 to GDS-II excess-64 real format.
fn f64_to_gds_real8(value: f64) -> [u8; 8] {
    if value == 0.0 {
        return [0u8; 8];
    }

    let sign_bit: u8 = if value < 0.0 { 0x80 } else { 0x00 };
    let mut val = value.abs();

    // Normalize so that 1/16 <= mantissa < 1.
    let mut exponent: i32 = 0;
    while val >= 1.0 && exponent < 63 {
        val /= 16.0;
        exponent += 1;
    }
    while val < 1.0 / 16.0 && exponent > -64 {
        val *= 16.0;
        exponent -= 1;
    }

    let mantissa = (val * (1u64 << 56) as f64).round() as u64;
    let mut result = mantissa.to_be_bytes();
    result[0] = sign_bit | ((exponent + 64) as u8 & 0x7F);
    result
}

// ── GDS-II Reader ─────────────────────────────────────────────────────

/// A reference as read, before the named structure is resolved.
#[derive(Debug)]
struct RawRef {
    sname: String,
    transform: Transform,
    array: Option<ArrayPlacement>,
}

#[derive(Debug)]
struct RawStructure {
    name: String,
    shapes: Vec<GeomPrimitive>,
    refs: Vec<RawRef>,
}

pub struct GdsReader<R: Read + Seek> {
    reader: R,
    db_unit_in_um: f64,
    library: String,
}

impl<R: Read + Seek> GdsReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            db_unit_in_um: 0.001, // 1nm database unit until UNITS says otherwise
            library: String::new(),
        }
    }

    /// Library name from LIBNAME, empty before [`read`](Self::read).
    pub fn library(&self) -> &str {
        &self.library
    }

    pub fn db_unit_in_um(&self) -> f64 {
        self.db_unit_in_um
    }

    /// Read the stream and return its top cell: the last defined structure
    /// no other structure references.
    pub fn read(&mut self) -> Result<Component, GdsError> {
        self.read_header()?;
        let structures = self.read_lib()?;

        let referenced: HashSet<&str> = structures
            .iter()
            .flat_map(|s| s.refs.iter().map(|r| r.sname.as_str()))
            .collect();
        let top = structures
            .iter()
            .rev()
            .find(|s| !referenced.contains(s.name.as_str()))
            .or(structures.last())
            .ok_or(GdsError::EmptyLibrary)?
            .name
            .clone();

        let index: HashMap<&str, &RawStructure> =
            structures.iter().map(|s| (s.name.as_str(), s)).collect();
        let mut built = HashMap::new();
        let component = resolve(&top, &index, &mut built, &mut HashSet::new())?;
        log::info!(
            "Read library '{}': {} cells, top cell '{}'",
            self.library,
            structures.len(),
            top
        );
        Ok(Arc::unwrap_or_clone(component))
    }

    fn read_record(&mut self) -> Result<Option<GdsRecord>, GdsError> {
        let mut len_buf = [0u8; 2];
        match self.reader.read_exact(&mut len_buf) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(GdsError::Io(e)),
        }

        let total_len = u16::from_be_bytes(len_buf) as usize;
        if total_len < 4 {
            let offset = self.reader.stream_position().unwrap_or(0);
            return Err(GdsError::InvalidRecord {
                offset,
                message: format!("Record length {} is too small", total_len),
            });
        }

        let mut type_buf = [0u8; 2];
        self.reader.read_exact(&mut type_buf)?;
        let record_type = u16::from_be_bytes(type_buf);

        let mut data = vec![0u8; total_len - 4];
        if !data.is_empty() {
            self.reader.read_exact(&mut data)?;
        }

        Ok(Some(GdsRecord { record_type, data }))
    }

    fn read_header(&mut self) -> Result<(), GdsError> {
        let rec = self.read_record()?.ok_or(GdsError::InvalidRecord {
            offset: 0,
            message: "Empty file".into(),
        })?;

        if rec.record_type != record_type::HEADER {
            return Err(GdsError::UnexpectedRecord {
                record_type: rec.record_type,
                expected: record_type::HEADER,
            });
        }

        if let Some(version) = rec.first_i16() {
            log::debug!("GDS-II version: {}", version);
        }
        Ok(())
    }

    fn read_lib(&mut self) -> Result<Vec<RawStructure>, GdsError> {
        let mut structures = Vec::new();

        while let Some(rec) = self.read_record()? {
            match rec.record_type {
                record_type::LIBNAME => {
                    self.library = rec.as_string();
                }
                record_type::UNITS => {
                    let units = rec.as_f64_vec();
                    if units.len() >= 2 {
                        // [db unit in user units, db unit in meters]
                        self.db_unit_in_um = units[1] * 1e6;
                        log::debug!("Database unit: {} um", self.db_unit_in_um);
                    }
                }
                record_type::BGNSTR => {
                    structures.push(self.read_structure()?);
                }
                record_type::ENDLIB => break,
                _ => {}
            }
        }

        Ok(structures)
    }

    fn read_structure(&mut self) -> Result<RawStructure, GdsError> {
        let mut structure = RawStructure {
            name: String::from("unnamed"),
            shapes: Vec::new(),
            refs: Vec::new(),
        };

        while let Some(rec) = self.read_record()? {
            match rec.record_type {
                record_type::STRNAME => {
                    structure.name = rec.as_string();
                    log::debug!("Reading cell: {}", structure.name);
                }
                record_type::BOUNDARY | record_type::BOX => {
                    if let Some(shape) = self.read_boundary()? {
                        structure.shapes.push(shape);
                    }
                }
                record_type::SREF | record_type::AREF => {
                    if let Some(reference) = self.read_ref(rec.record_type == record_type::AREF)? {
                        structure.refs.push(reference);
                    }
                }
                record_type::PATH | record_type::TEXT | record_type::NODE => {
                    log::warn!(
                        "Skipping unsupported element 0x{:04X} in '{}'",
                        rec.record_type,
                        structure.name
                    );
                    self.skip_to_endel()?;
                }
                record_type::ENDSTR => break,
                _ => {}
            }
        }

        Ok(structure)
    }

    fn to_points(&self, rec: &GdsRecord) -> Vec<Point> {
        rec.as_i32_vec()
            .chunks_exact(2)
            .map(|pair| {
                Point::new(
                    pair[0] as f64 * self.db_unit_in_um,
                    pair[1] as f64 * self.db_unit_in_um,
                )
            })
            .collect()
    }

    /// BOUNDARY or BOX element body.
    fn read_boundary(&mut self) -> Result<Option<GeomPrimitive>, GdsError> {
        let mut layer: u16 = 0;
        let mut datatype: u16 = 0;
        let mut points: Vec<Point> = Vec::new();

        while let Some(rec) = self.read_record()? {
            match rec.record_type {
                record_type::LAYER => {
                    layer = rec.first_i16().unwrap_or(0) as u16;
                }
                record_type::DATATYPE | record_type::BOXTYPE => {
                    datatype = rec.first_i16().unwrap_or(0) as u16;
                }
                record_type::XY => {
                    points = self.to_points(&rec);
                }
                record_type::ENDEL => break,
                _ => {}
            }
        }

        // Boundaries repeat the first point to close the outline.
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }

        let layer = LayerId::new(layer, datatype);
        Ok(match BBox::from_points(&points) {
            None => None,
            Some(bbox) if points.len() == 4 && is_axis_aligned_rect(&points) => {
                Some(GeomPrimitive::Rect(Rect::new(
                    layer, bbox.min.x, bbox.min.y, bbox.max.x, bbox.max.y,
                )))
            }
            Some(_) => Some(GeomPrimitive::Polygon(Polygon::new(layer, points))),
        })
    }

    /// SREF or AREF element body.
    fn read_ref(&mut self, is_array: bool) -> Result<Option<RawRef>, GdsError> {
        let mut sname = String::new();
        let mut transform = Transform::default();
        let mut colrow: Option<(usize, usize)> = None;
        let mut points: Vec<Point> = Vec::new();

        while let Some(rec) = self.read_record()? {
            match rec.record_type {
                record_type::SNAME => {
                    sname = rec.as_string();
                }
                record_type::STRANS => {
                    if let Some(flags) = rec.first_i16() {
                        transform.mirror_x = (flags as u16 & STRANS_REFLECT) != 0;
                    }
                }
                record_type::MAG => {
                    if let Some(&mag) = rec.as_f64_vec().first() {
                        transform.scale = mag;
                    }
                }
                record_type::ANGLE => {
                    if let Some(&angle) = rec.as_f64_vec().first() {
                        transform.rotation = angle;
                    }
                }
                record_type::COLROW => {
                    let vals = rec.as_i16_vec();
                    if vals.len() >= 2 {
                        colrow = Some((vals[0].max(0) as usize, vals[1].max(0) as usize));
                    }
                }
                record_type::XY => {
                    points = self.to_points(&rec);
                }
                record_type::ENDEL => break,
                _ => {}
            }
        }

        if sname.is_empty() {
            return Ok(None);
        }
        let origin = *points.first().ok_or(GdsError::InvalidCoordinates)?;
        transform.offset = origin;

        let array = match (is_array, colrow) {
            (false, _) => None,
            (true, Some((columns, rows))) if points.len() >= 3 && columns > 0 && rows > 0 => {
                Some(ArrayPlacement::new(
                    columns,
                    rows,
                    (points[1].x - origin.x) / columns as f64,
                    (points[2].y - origin.y) / rows as f64,
                ))
            }
            (true, _) => return Err(GdsError::InvalidCoordinates),
        };

        Ok(Some(RawRef {
            sname,
            transform,
            array,
        }))
    }

    fn skip_to_endel(&mut self) -> Result<(), GdsError> {
        while let Some(rec) = self.read_record()? {
            if rec.record_type == record_type::ENDEL {
                break;
            }
        }
        Ok(())
    }
}

/// Build `name` and everything below it, children first.
fn resolve(
    name: &str,
    index: &HashMap<&str, &RawStructure>,
    built: &mut HashMap<String, Arc<Component>>,
    visiting: &mut HashSet<String>,
) -> Result<Arc<Component>, GdsError> {
    if let Some(component) = built.get(name) {
        return Ok(component.clone());
    }
    let raw = index
        .get(name)
        .ok_or_else(|| GdsError::UndefinedCell(name.to_string()))?;
    if !visiting.insert(name.to_string()) {
        return Err(GdsError::RecursiveCell(name.to_string()));
    }

    let mut component = Component::new(&raw.name);
    component.shapes = raw.shapes.clone();
    for r in &raw.refs {
        let child = resolve(&r.sname, index, built, visiting)?;
        component.references.push(ComponentRef {
            component: child,
            transform: r.transform,
            array: r.array,
        });
    }

    visiting.remove(name);
    let component = Arc::new(component);
    built.insert(name.to_string(), component.clone());
    Ok(component)
}

/// Check if 4 points form an axis-aligned rectangle.
fn is_axis_aligned_rect(points: &[Point]) -> bool {
    if points.len() != 4 {
        return false;
    }
    let unique_x: HashSet<u64> = points.iter().map(|p| p.x.to_bits()).collect();
    let unique_y: HashSet<u64> = points.iter().map(|p| p.y.to_bits()).collect();
    unique_x.len() == 2 && unique_y.len() == 2
}

// ── GDS-II Writer ─────────────────────────────────────────────────────

pub struct GdsWriter<W: io::Write> {
    writer: W,
    db_unit_in_um: f64,
    library: String,
}

impl<W: io::Write> GdsWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            db_unit_in_um: 0.001,
            library: String::from("library"),
        }
    }

    /// Database unit in microns, e.g. `0.001` for 1000 units per micron.
    pub fn with_db_unit(mut self, db_unit_in_um: f64) -> Self {
        self.db_unit_in_um = db_unit_in_um;
        self
    }

    pub fn with_library(mut self, name: &str) -> Self {
        self.library = name.to_string();
        self
    }

    /// Write `top` and every component it references.
    pub fn write(&mut self, top: &Component) -> Result<(), GdsError> {
        self.write_i16_record(record_type::HEADER, &[600])?; // GDS version 6
        self.write_i16_record(record_type::BGNLIB, &TIMESTAMP)?;
        let library = self.library.clone();
        self.write_string_record(record_type::LIBNAME, &library)?;
        self.write_real8_record(
            record_type::UNITS,
            &[self.db_unit_in_um, self.db_unit_in_um * 1e-6],
        )?;

        let mut order = Vec::new();
        collect_children(top, &mut HashSet::new(), &mut order);
        let mut names = StructureNames::default();
        for child in &order {
            names.assign(child);
        }
        names.assign(top);

        for child in &order {
            self.write_structure(child, &names)?;
        }
        self.write_structure(top, &names)?;

        self.write_record(record_type::ENDLIB, &[])?;
        self.writer.flush()?;
        log::info!(
            "Wrote GDS library '{}': {} cells, top cell '{}'",
            self.library,
            order.len() + 1,
            top.name
        );
        Ok(())
    }

    fn write_record(&mut self, record_type: u16, data: &[u8]) -> Result<(), GdsError> {
        let total_len = u16::try_from(data.len() + 4).map_err(|_| GdsError::InvalidRecord {
            offset: 0,
            message: format!("Record payload of {} bytes is too large", data.len()),
        })?;
        self.writer.write_all(&total_len.to_be_bytes())?;
        self.writer.write_all(&record_type.to_be_bytes())?;
        if !data.is_empty() {
            self.writer.write_all(data)?;
        }
        Ok(())
    }

    fn write_i16_record(&mut self, record_type: u16, values: &[i16]) -> Result<(), GdsError> {
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
        self.write_record(record_type, &data)
    }

    fn write_i32_record(&mut self, record_type: u16, values: &[i32]) -> Result<(), GdsError> {
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
        self.write_record(record_type, &data)
    }

    fn write_string_record(&mut self, record_type: u16, s: &str) -> Result<(), GdsError> {
        let mut data: Vec<u8> = s.bytes().collect();
        // GDS strings must be even length
        if data.len() % 2 != 0 {
            data.push(0);
        }
        self.write_record(record_type, &data)
    }

    fn write_real8_record(&mut self, record_type: u16, values: &[f64]) -> Result<(), GdsError> {
        let data: Vec<u8> = values.iter().flat_map(|v| f64_to_gds_real8(*v)).collect();
        self.write_record(record_type, &data)
    }

    /// Microns to database units, rounded to the nearest unit.
    fn to_db(&self, value: f64) -> Result<i32, GdsError> {
        let scaled = (value / self.db_unit_in_um).round();
        if scaled.is_finite() && scaled >= i32::MIN as f64 && scaled <= i32::MAX as f64 {
            Ok(scaled as i32)
        } else {
            Err(GdsError::InvalidCoordinates)
        }
    }

    fn to_db_points(&self, points: &[Point]) -> Result<Vec<i32>, GdsError> {
        let mut coords = Vec::with_capacity(points.len() * 2);
        for p in points {
            coords.push(self.to_db(p.x)?);
            coords.push(self.to_db(p.y)?);
        }
        Ok(coords)
    }

    fn write_structure(
        &mut self,
        component: &Component,
        names: &StructureNames,
    ) -> Result<(), GdsError> {
        self.write_i16_record(record_type::BGNSTR, &TIMESTAMP)?;
        self.write_string_record(record_type::STRNAME, names.get(component))?;

        for shape in &component.shapes {
            self.write_boundary(shape)?;
        }
        for reference in &component.references {
            self.write_ref(reference, names)?;
        }

        self.write_record(record_type::ENDSTR, &[])
    }

    fn write_boundary(&mut self, shape: &GeomPrimitive) -> Result<(), GdsError> {
        let mut vertices = shape.vertices();
        let Some(&first) = vertices.first() else {
            return Ok(());
        };
        vertices.push(first);
        let layer = shape.layer();

        self.write_record(record_type::BOUNDARY, &[])?;
        self.write_i16_record(record_type::LAYER, &[layer.layer as i16])?;
        self.write_i16_record(record_type::DATATYPE, &[layer.datatype as i16])?;
        let coords = self.to_db_points(&vertices)?;
        self.write_i32_record(record_type::XY, &coords)?;
        self.write_record(record_type::ENDEL, &[])
    }

    fn write_ref(&mut self, reference: &ComponentRef, names: &StructureNames) -> Result<(), GdsError> {
        let t = &reference.transform;
        let kind = if reference.array.is_some() {
            record_type::AREF
        } else {
            record_type::SREF
        };

        self.write_record(kind, &[])?;
        self.write_string_record(record_type::SNAME, names.get(&reference.component))?;

        if t.mirror_x || t.rotation != 0.0 || t.scale != 1.0 {
            let flags = if t.mirror_x { STRANS_REFLECT } else { 0 };
            self.write_i16_record(record_type::STRANS, &[flags as i16])?;
        }
        if t.scale != 1.0 {
            self.write_real8_record(record_type::MAG, &[t.scale])?;
        }
        if t.rotation != 0.0 {
            self.write_real8_record(record_type::ANGLE, &[t.rotation])?;
        }

        let origin = t.offset;
        match &reference.array {
            None => {
                let coords = self.to_db_points(&[origin])?;
                self.write_i32_record(record_type::XY, &coords)?;
            }
            Some(array) => {
                self.write_i16_record(
                    record_type::COLROW,
                    &[array_count(array.columns)?, array_count(array.rows)?],
                )?;
                let coords = self.to_db_points(&[
                    origin,
                    origin.translate(array.columns as f64 * array.column_pitch, 0.0),
                    origin.translate(0.0, array.rows as f64 * array.row_pitch),
                ])?;
                self.write_i32_record(record_type::XY, &coords)?;
            }
        }

        self.write_record(record_type::ENDEL, &[])
    }
}

fn array_count(count: usize) -> Result<i16, GdsError> {
    i16::try_from(count).map_err(|_| GdsError::ArrayTooLarge(count))
}

/// Every component below `component`, each once, children before parents.
fn collect_children(
    component: &Component,
    seen: &mut HashSet<ComponentId>,
    order: &mut Vec<Arc<Component>>,
) {
    for reference in &component.references {
        let child = &reference.component;
        if seen.insert(child.id) {
            collect_children(child, seen, order);
            order.push(child.clone());
        }
    }
}

/// Unique structure names. Distinct components that share a name get a
/// `$n` suffix.
#[derive(Default)]
struct StructureNames {
    by_id: HashMap<ComponentId, String>,
    used: HashSet<String>,
}

impl StructureNames {
    fn assign(&mut self, component: &Component) {
        if self.by_id.contains_key(&component.id) {
            return;
        }
        let mut name = component.name.clone();
        let mut n = 1;
        while self.used.contains(&name) {
            name = format!("{}${}", component.name, n);
            n += 1;
        }
        self.used.insert(name.clone());
        self.by_id.insert(component.id, name);
    }

    fn get<'a>(&'a self, component: &'a Component) -> &'a str {
        self.by_id
            .get(&component.id)
            .map(String::as_str)
            .unwrap_or(component.name.as_str())
    }
}

/// Write `component` as a GDS-II stream with a 1nm database unit.
pub fn write_gds<W: io::Write>(component: &Component, writer: W) -> Result<(), GdsError> {
    GdsWriter::new(writer)
        .with_library(&component.name)
        .write(component)
}

/// Read a GDS-II stream and return its top cell.
pub fn read_gds<R: Read + Seek>(reader: R) -> Result<Component, GdsError> {
    GdsReader::new(reader).read()
}
