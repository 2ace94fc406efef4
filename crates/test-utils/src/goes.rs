//! Synthetic ABI scenes in NetCDF classic containers.

use chrono::{DateTime, SecondsFormat, Utc};

/// Parameters for a synthetic scene.
#[derive(Debug, Clone)]
pub struct SceneSpec {
    pub platform: String,
    pub timestamp: DateTime<Utc>,
    pub width: usize,
    pub height: usize,
    /// Physical values, row-major; NaN encodes fill.
    pub values: Vec<f32>,
    pub x_scale: f64,
    pub x_offset: f64,
    pub y_scale: f64,
    pub y_offset: f64,
}

impl SceneSpec {
    /// A small scene with a left-to-right gradient in 0..1.
    pub fn gradient(platform: &str, timestamp: DateTime<Utc>, width: usize, height: usize) -> Self {
        let values = (0..width * height)
            .map(|i| (i % width) as f32 / width.max(1) as f32)
            .collect();
        Self {
            platform: platform.to_string(),
            timestamp,
            width,
            height,
            values,
            x_scale: 1.4e-5,
            x_offset: -0.101332,
            y_scale: -1.4e-5,
            y_offset: 0.128212,
        }
    }
}

/// Short coding used for the CMI grids (raw = value / SCALE).
const CMI_SCALE: f32 = 0.001;
const CMI_FILL: i16 = -1;

/// Build a single-band CMIP product file.
pub fn cmip_scene(spec: &SceneSpec) -> Vec<u8> {
    build_scene(spec, &[("CMI", &spec.values)])
}

/// Build a multi-band MCMIP product file with the three true-color bands.
pub fn mcmip_scene(spec: &SceneSpec, red: &[f32], veggie: &[f32], blue: &[f32]) -> Vec<u8> {
    build_scene(
        spec,
        &[("CMI_C01", blue), ("CMI_C02", red), ("CMI_C03", veggie)],
    )
}

fn build_scene(spec: &SceneSpec, grids: &[(&str, &[f32])]) -> Vec<u8> {
    let mut file = NcBuilder::new();
    file.dim("y", spec.height);
    file.dim("x", spec.width);

    file.global_attr("platform_ID", AttrVal::Text(spec.platform.clone()));
    file.global_attr(
        "time_coverage_start",
        AttrVal::Text(
            spec.timestamp
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        ),
    );

    for (name, values) in grids {
        assert_eq!(values.len(), spec.width * spec.height);
        let raw: Vec<i16> = values
            .iter()
            .map(|v| {
                if v.is_nan() {
                    CMI_FILL
                } else {
                    (v / CMI_SCALE).round() as i16
                }
            })
            .collect();
        file.var(
            name,
            vec![0, 1],
            3,
            encode_shorts(&raw),
            vec![
                ("scale_factor", AttrVal::Floats(vec![CMI_SCALE])),
                ("add_offset", AttrVal::Floats(vec![0.0])),
                ("_FillValue", AttrVal::Shorts(vec![CMI_FILL])),
            ],
        );
    }

    let x_raw: Vec<i16> = (0..spec.width as i16).collect();
    file.var(
        "x",
        vec![1],
        3,
        encode_shorts(&x_raw),
        vec![
            ("scale_factor", AttrVal::Doubles(vec![spec.x_scale])),
            ("add_offset", AttrVal::Doubles(vec![spec.x_offset])),
        ],
    );
    let y_raw: Vec<i16> = (0..spec.height as i16).collect();
    file.var(
        "y",
        vec![0],
        3,
        encode_shorts(&y_raw),
        vec![
            ("scale_factor", AttrVal::Doubles(vec![spec.y_scale])),
            ("add_offset", AttrVal::Doubles(vec![spec.y_offset])),
        ],
    );

    file.var(
        "goes_imager_projection",
        vec![],
        4,
        vec![0, 0, 0, 0],
        vec![
            ("perspective_point_height", AttrVal::Doubles(vec![35_786_023.0])),
            ("semi_major_axis", AttrVal::Doubles(vec![6_378_137.0])),
            ("semi_minor_axis", AttrVal::Doubles(vec![6_356_752.31414])),
            ("longitude_of_projection_origin", AttrVal::Doubles(vec![-75.0])),
        ],
    );

    file.build()
}

fn encode_shorts(values: &[i16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 2);
    for v in values {
        out.extend_from_slice(&v.to_be_bytes());
    }
    out
}

/// Attribute payloads the builder supports.
#[derive(Debug, Clone)]
pub enum AttrVal {
    Text(String),
    Shorts(Vec<i16>),
    Floats(Vec<f32>),
    Doubles(Vec<f64>),
}

struct VarSpec {
    name: String,
    dim_ids: Vec<usize>,
    nc_type: u32,
    data: Vec<u8>,
    attrs: Vec<(String, AttrVal)>,
}

/// Two-pass NetCDF classic (CDF-1) writer.
struct NcBuilder {
    dims: Vec<(String, usize)>,
    gattrs: Vec<(String, AttrVal)>,
    vars: Vec<VarSpec>,
}

impl NcBuilder {
    fn new() -> Self {
        Self {
            dims: Vec::new(),
            gattrs: Vec::new(),
            vars: Vec::new(),
        }
    }

    fn dim(&mut self, name: &str, len: usize) {
        self.dims.push((name.to_string(), len));
    }

    fn global_attr(&mut self, name: &str, value: AttrVal) {
        self.gattrs.push((name.to_string(), value));
    }

    fn var(
        &mut self,
        name: &str,
        dim_ids: Vec<usize>,
        nc_type: u32,
        data: Vec<u8>,
        attrs: Vec<(&str, AttrVal)>,
    ) {
        self.vars.push(VarSpec {
            name: name.to_string(),
            dim_ids,
            nc_type,
            data,
            attrs: attrs
                .into_iter()
                .map(|(n, v)| (n.to_string(), v))
                .collect(),
        });
    }

    fn build(&self) -> Vec<u8> {
        // First pass with zero begins measures the header length.
        let header_len = self.header(&vec![0; self.vars.len()]).len();

        let mut begins = Vec::with_capacity(self.vars.len());
        let mut offset = header_len;
        for var in &self.vars {
            begins.push(offset as u32);
            offset += padded_len(var.data.len());
        }

        let mut out = self.header(&begins);
        for var in &self.vars {
            out.extend_from_slice(&var.data);
            out.resize(out.len() + padded_len(var.data.len()) - var.data.len(), 0);
        }
        out
    }

    fn header(&self, begins: &[u32]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"CDF\x01");
        out.extend_from_slice(&0u32.to_be_bytes()); // numrecs

        // Dimension list.
        out.extend_from_slice(&0x0Au32.to_be_bytes());
        out.extend_from_slice(&(self.dims.len() as u32).to_be_bytes());
        for (name, len) in &self.dims {
            write_name(&mut out, name);
            out.extend_from_slice(&(*len as u32).to_be_bytes());
        }

        write_attr_list(&mut out, &self.gattrs);

        // Variable list.
        out.extend_from_slice(&0x0Bu32.to_be_bytes());
        out.extend_from_slice(&(self.vars.len() as u32).to_be_bytes());
        for (var, begin) in self.vars.iter().zip(begins) {
            write_name(&mut out, &var.name);
            out.extend_from_slice(&(var.dim_ids.len() as u32).to_be_bytes());
            for id in &var.dim_ids {
                out.extend_from_slice(&(*id as u32).to_be_bytes());
            }
            write_attr_list(&mut out, &var.attrs);
            out.extend_from_slice(&var.nc_type.to_be_bytes());
            out.extend_from_slice(&(padded_len(var.data.len()) as u32).to_be_bytes());
            out.extend_from_slice(&begin.to_be_bytes());
        }
        out
    }
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(4) * 4
}

fn write_name(out: &mut Vec<u8>, name: &str) {
    out.extend_from_slice(&(name.len() as u32).to_be_bytes());
    out.extend_from_slice(name.as_bytes());
    out.resize(out.len() + padded_len(name.len()) - name.len(), 0);
}

fn write_attr_list(out: &mut Vec<u8>, attrs: &[(String, AttrVal)]) {
    if attrs.is_empty() {
        out.extend_from_slice(&0u32.to_be_bytes());
        out.extend_from_slice(&0u32.to_be_bytes());
        return;
    }
    out.extend_from_slice(&0x0Cu32.to_be_bytes());
    out.extend_from_slice(&(attrs.len() as u32).to_be_bytes());
    for (name, value) in attrs {
        write_name(out, name);
        match value {
            AttrVal::Text(s) => {
                out.extend_from_slice(&2u32.to_be_bytes());
                out.extend_from_slice(&(s.len() as u32).to_be_bytes());
                out.extend_from_slice(s.as_bytes());
                out.resize(out.len() + padded_len(s.len()) - s.len(), 0);
            }
            AttrVal::Shorts(v) => {
                out.extend_from_slice(&3u32.to_be_bytes());
                out.extend_from_slice(&(v.len() as u32).to_be_bytes());
                for x in v {
                    out.extend_from_slice(&x.to_be_bytes());
                }
                out.resize(out.len() + padded_len(v.len() * 2) - v.len() * 2, 0);
            }
            AttrVal::Floats(v) => {
                out.extend_from_slice(&5u32.to_be_bytes());
                out.extend_from_slice(&(v.len() as u32).to_be_bytes());
                for x in v {
                    out.extend_from_slice(&x.to_be_bytes());
                }
            }
            AttrVal::Doubles(v) => {
                out.extend_from_slice(&6u32.to_be_bytes());
                out.extend_from_slice(&(v.len() as u32).to_be_bytes());
                for x in v {
                    out.extend_from_slice(&x.to_be_bytes());
                }
            }
        }
    }
}
