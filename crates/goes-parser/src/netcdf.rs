//! Minimal NetCDF classic (CDF-1/CDF-2) reader.
//!
//! Parses the header (dimensions, attributes, variables) and reads
//! non-record variable data. Covers the subset the ABI products use:
//! byte, char, short, int, float and double values.

use std::collections::HashMap;

use crate::{GoesError, GoesResult};

const NC_DIMENSION: u32 = 0x0A;
const NC_VARIABLE: u32 = 0x0B;
const NC_ATTRIBUTE: u32 = 0x0C;

/// Attribute or variable payload values.
#[derive(Debug, Clone, PartialEq)]
pub enum NcValue {
    Bytes(Vec<i8>),
    Text(String),
    Shorts(Vec<i16>),
    Ints(Vec<i32>),
    Floats(Vec<f32>),
    Doubles(Vec<f64>),
}

impl NcValue {
    /// First element as f64, for scalar numeric attributes.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NcValue::Bytes(v) => v.first().map(|&x| x as f64),
            NcValue::Shorts(v) => v.first().map(|&x| x as f64),
            NcValue::Ints(v) => v.first().map(|&x| x as f64),
            NcValue::Floats(v) => v.first().map(|&x| x as f64),
            NcValue::Doubles(v) => v.first().copied(),
            NcValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            NcValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// One dimension from the header.
#[derive(Debug, Clone)]
pub struct NcDim {
    pub name: String,
    pub len: usize,
}

/// One variable from the header.
#[derive(Debug, Clone)]
pub struct NcVar {
    pub name: String,
    pub dim_ids: Vec<usize>,
    pub attrs: HashMap<String, NcValue>,
    pub nc_type: u32,
    pub begin: u64,
}

impl NcVar {
    pub fn attr_f64(&self, name: &str) -> Option<f64> {
        self.attrs.get(name).and_then(NcValue::as_f64)
    }
}

/// A parsed NetCDF classic file.
#[derive(Debug)]
pub struct NcFile<'a> {
    data: &'a [u8],
    pub dims: Vec<NcDim>,
    pub attrs: HashMap<String, NcValue>,
    pub vars: Vec<NcVar>,
}

impl<'a> NcFile<'a> {
    /// Parse the container header.
    pub fn parse(data: &'a [u8]) -> GoesResult<Self> {
        let mut r = Reader::new(data);

        let magic = r.bytes(3)?;
        if magic != b"CDF" {
            return Err(GoesError::InvalidFormat(
                "missing CDF magic bytes".to_string(),
            ));
        }
        let version = r.u8()?;
        if version != 1 && version != 2 {
            return Err(GoesError::InvalidFormat(format!(
                "unsupported CDF version: {version}"
            )));
        }
        let offsets_64bit = version == 2;

        let _numrecs = r.u32()?;

        let dims = Self::parse_dim_list(&mut r)?;
        let attrs = Self::parse_attr_list(&mut r)?;
        let vars = Self::parse_var_list(&mut r, offsets_64bit)?;

        Ok(Self {
            data,
            dims,
            attrs,
            vars,
        })
    }

    pub fn global_attr(&self, name: &str) -> Option<&NcValue> {
        self.attrs.get(name)
    }

    pub fn var(&self, name: &str) -> Option<&NcVar> {
        self.vars.iter().find(|v| v.name == name)
    }

    /// Shape of a variable in row-major dimension order.
    pub fn var_shape(&self, var: &NcVar) -> Vec<usize> {
        var.dim_ids.iter().map(|&id| self.dims[id].len).collect()
    }

    /// Read a variable's full data payload.
    pub fn read_var(&self, var: &NcVar) -> GoesResult<NcValue> {
        let count: usize = self.var_shape(var).iter().product::<usize>().max(1);
        let begin = var.begin as usize;
        let mut r = Reader::at(self.data, begin)?;

        match var.nc_type {
            1 => Ok(NcValue::Bytes(
                r.bytes(count)?.iter().map(|&b| b as i8).collect(),
            )),
            2 => {
                let raw = r.bytes(count)?;
                Ok(NcValue::Text(
                    String::from_utf8_lossy(raw).trim_end_matches('\0').to_string(),
                ))
            }
            3 => (0..count).map(|_| r.i16()).collect::<GoesResult<Vec<_>>>().map(NcValue::Shorts),
            4 => (0..count).map(|_| r.i32()).collect::<GoesResult<Vec<_>>>().map(NcValue::Ints),
            5 => (0..count).map(|_| r.f32()).collect::<GoesResult<Vec<_>>>().map(NcValue::Floats),
            6 => (0..count).map(|_| r.f64()).collect::<GoesResult<Vec<_>>>().map(NcValue::Doubles),
            t => Err(GoesError::InvalidFormat(format!(
                "unsupported variable type {t} for {}",
                var.name
            ))),
        }
    }

    /// Read a variable and apply its scale_factor/add_offset/_FillValue
    /// attributes, producing physical f32 values with NaN for fill.
    pub fn read_var_scaled(&self, name: &str) -> GoesResult<Vec<f32>> {
        let var = self
            .var(name)
            .ok_or_else(|| GoesError::MissingData(format!("variable {name}")))?;

        let scale = var.attr_f64("scale_factor").unwrap_or(1.0) as f32;
        let offset = var.attr_f64("add_offset").unwrap_or(0.0) as f32;
        let fill = var.attr_f64("_FillValue");

        let raw: Vec<f32> = match self.read_var(var)? {
            NcValue::Shorts(v) => v.iter().map(|&x| x as f32).collect(),
            NcValue::Ints(v) => v.iter().map(|&x| x as f32).collect(),
            NcValue::Floats(v) => v,
            NcValue::Doubles(v) => v.iter().map(|&x| x as f32).collect(),
            NcValue::Bytes(v) => v.iter().map(|&x| x as f32).collect(),
            NcValue::Text(_) => {
                return Err(GoesError::InvalidFormat(format!(
                    "variable {name} holds text, expected numbers"
                )))
            }
        };

        Ok(raw
            .into_iter()
            .map(|x| match fill {
                Some(f) if (x as f64 - f).abs() < f64::EPSILON => f32::NAN,
                _ => x * scale + offset,
            })
            .collect())
    }

    // ===== Header section parsers =====

    fn parse_dim_list(r: &mut Reader) -> GoesResult<Vec<NcDim>> {
        let (tag, count) = (r.u32()?, r.u32()? as usize);
        if tag != NC_DIMENSION && (tag != 0 || count != 0) {
            return Err(GoesError::InvalidFormat("bad dimension list tag".to_string()));
        }

        let mut dims = Vec::with_capacity(count);
        for _ in 0..count {
            let name = r.name()?;
            let len = r.u32()? as usize;
            dims.push(NcDim { name, len });
        }
        Ok(dims)
    }

    fn parse_attr_list(r: &mut Reader) -> GoesResult<HashMap<String, NcValue>> {
        let (tag, count) = (r.u32()?, r.u32()? as usize);
        if tag != NC_ATTRIBUTE && (tag != 0 || count != 0) {
            return Err(GoesError::InvalidFormat("bad attribute list tag".to_string()));
        }

        let mut attrs = HashMap::with_capacity(count);
        for _ in 0..count {
            let name = r.name()?;
            let nc_type = r.u32()?;
            let nelems = r.u32()? as usize;
            let value = r.attr_value(nc_type, nelems)?;
            attrs.insert(name, value);
        }
        Ok(attrs)
    }

    fn parse_var_list(r: &mut Reader, offsets_64bit: bool) -> GoesResult<Vec<NcVar>> {
        let (tag, count) = (r.u32()?, r.u32()? as usize);
        if tag != NC_VARIABLE && (tag != 0 || count != 0) {
            return Err(GoesError::InvalidFormat("bad variable list tag".to_string()));
        }

        let mut vars = Vec::with_capacity(count);
        for _ in 0..count {
            let name = r.name()?;
            let ndims = r.u32()? as usize;
            let mut dim_ids = Vec::with_capacity(ndims);
            for _ in 0..ndims {
                dim_ids.push(r.u32()? as usize);
            }
            let attrs = Self::parse_attr_list(r)?;
            let nc_type = r.u32()?;
            let _vsize = r.u32()?;
            let begin = if offsets_64bit { r.u64()? } else { r.u32()? as u64 };

            vars.push(NcVar {
                name,
                dim_ids,
                attrs,
                nc_type,
                begin,
            });
        }
        Ok(vars)
    }
}

/// Big-endian cursor over the container bytes.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn at(data: &'a [u8], pos: usize) -> GoesResult<Self> {
        if pos > data.len() {
            return Err(GoesError::InvalidFormat(format!(
                "data offset {pos} past end of file"
            )));
        }
        Ok(Self { data, pos })
    }

    fn bytes(&mut self, n: usize) -> GoesResult<&'a [u8]> {
        if self.pos + n > self.data.len() {
            return Err(GoesError::InvalidFormat("unexpected end of file".to_string()));
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn u8(&mut self) -> GoesResult<u8> {
        Ok(self.bytes(1)?[0])
    }

    fn u32(&mut self) -> GoesResult<u32> {
        let b = self.bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn u64(&mut self) -> GoesResult<u64> {
        let b = self.bytes(8)?;
        Ok(u64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    fn i16(&mut self) -> GoesResult<i16> {
        let b = self.bytes(2)?;
        Ok(i16::from_be_bytes([b[0], b[1]]))
    }

    fn i32(&mut self) -> GoesResult<i32> {
        Ok(self.u32()? as i32)
    }

    fn f32(&mut self) -> GoesResult<f32> {
        Ok(f32::from_bits(self.u32()?))
    }

    fn f64(&mut self) -> GoesResult<f64> {
        Ok(f64::from_bits(self.u64()?))
    }

    /// Read a name: u32 length, then characters padded to 4 bytes.
    fn name(&mut self) -> GoesResult<String> {
        let len = self.u32()? as usize;
        let raw = self.bytes(len)?;
        let name = String::from_utf8_lossy(raw).to_string();
        self.skip_padding(len)?;
        Ok(name)
    }

    /// Read an attribute value with trailing alignment padding.
    fn attr_value(&mut self, nc_type: u32, nelems: usize) -> GoesResult<NcValue> {
        let value = match nc_type {
            1 => {
                let raw = self.bytes(nelems)?;
                let v = NcValue::Bytes(raw.iter().map(|&b| b as i8).collect());
                self.skip_padding(nelems)?;
                v
            }
            2 => {
                let raw = self.bytes(nelems)?;
                let v = NcValue::Text(String::from_utf8_lossy(raw).to_string());
                self.skip_padding(nelems)?;
                v
            }
            3 => {
                let v = (0..nelems).map(|_| self.i16()).collect::<GoesResult<Vec<_>>>()?;
                self.skip_padding(nelems * 2)?;
                NcValue::Shorts(v)
            }
            4 => NcValue::Ints((0..nelems).map(|_| self.i32()).collect::<GoesResult<Vec<_>>>()?),
            5 => NcValue::Floats((0..nelems).map(|_| self.f32()).collect::<GoesResult<Vec<_>>>()?),
            6 => NcValue::Doubles((0..nelems).map(|_| self.f64()).collect::<GoesResult<Vec<_>>>()?),
            t => {
                return Err(GoesError::InvalidFormat(format!(
                    "unsupported attribute type {t}"
                )))
            }
        };
        Ok(value)
    }

    fn skip_padding(&mut self, consumed: usize) -> GoesResult<()> {
        let rem = consumed % 4;
        if rem != 0 {
            self.bytes(4 - rem)?;
        }
        Ok(())
    }
}
