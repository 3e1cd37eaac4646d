use std::collections::BTreeMap;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

const SIGMAS_PATH: &str = "data/sigmas_and_xis.json";
const GLYPHS_PATH: &str = "data/font_metrics_data.json";

/// TeX font parameters, one value per size set (text, script, scriptscript)
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SigmasFile {
    sigmas_and_xis: BTreeMap<String, [f64; 3]>,
    #[serde(default)]
    field_docs: BTreeMap<String, String>,
}

/// Glyph tables: family -> code point -> [depth, height, italic, skew, width]
type GlyphFile = BTreeMap<String, BTreeMap<u32, [f64; 5]>>;

fn main() {
    println!("cargo:rerun-if-changed={SIGMAS_PATH}");
    println!("cargo:rerun-if-changed={GLYPHS_PATH}");

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    let sigmas: SigmasFile = read_json(SIGMAS_PATH);
    write_generated(
        &out_dir,
        "sigmas_and_xis_generated.rs",
        &layout_constants(&sigmas),
    );

    let glyphs: GlyphFile = read_json(GLYPHS_PATH);
    write_generated(&out_dir, "font_metrics_data_phf.rs", &glyph_tables(&glyphs));
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> T {
    let text = fs::read_to_string(path).unwrap_or_else(|err| panic!("reading {path}: {err}"));
    serde_json::from_str(&text).unwrap_or_else(|err| panic!("parsing {path}: {err}"))
}

fn write_generated(out_dir: &Path, name: &str, code: &str) {
    let dest = out_dir.join(name);
    fs::write(&dest, code).unwrap_or_else(|err| panic!("writing {}: {err}", dest.display()));
}

/// `xHeight` -> `x_height`
fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            if !out.is_empty() {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Float literal that stays a float in generated code
fn literal(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}

fn layout_constants(data: &SigmasFile) -> String {
    let quad = data
        .sigmas_and_xis
        .get("quad")
        .expect("sigmas_and_xis.json must define quad");

    let mut code = String::from(
        "// Generated by build.rs from data/sigmas_and_xis.json\n\n\
         /// Layout constants for one font size set (text, script, scriptscript)\n\
         #[derive(Debug, Clone, PartialEq)]\n\
         pub struct FontMetrics {\n",
    );
    for name in data.sigmas_and_xis.keys() {
        if let Some(doc) = data.field_docs.get(name) {
            writeln!(code, "    /// {doc}").ok();
        }
        writeln!(code, "    pub {}: f64,", snake_case(name)).ok();
    }
    code.push_str("    /// Width of one mu, a quad divided by 18\n    pub css_em_per_mu: f64,\n}\n\n");

    code.push_str(
        "/// Constants for textstyle, scriptstyle and scriptscriptstyle\n\
         pub const FONT_METRICS: [FontMetrics; 3] = [\n",
    );
    for set in 0..3 {
        code.push_str("    FontMetrics {\n");
        for (name, values) in &data.sigmas_and_xis {
            writeln!(code, "        {}: {},", snake_case(name), literal(values[set])).ok();
        }
        writeln!(code, "        css_em_per_mu: {},", literal(quad[set] / 18.0)).ok();
        code.push_str("    },\n");
    }
    code.push_str("];\n");
    code
}

fn glyph_tables(data: &GlyphFile) -> String {
    let mut code = String::from("// Generated by build.rs from data/font_metrics_data.json\n\n");
    let mut index = phf_codegen::Map::new();

    for (family, glyphs) in data {
        let table = format!("{}_METRICS", family.replace(['-', '.'], "_").to_uppercase());
        index.entry(family.as_str(), format!("&{table}"));

        let mut map = phf_codegen::Map::new();
        for (code_point, fields) in glyphs {
            let args = fields.map(literal).join(", ");
            map.entry(*code_point, format!("CharacterMetrics::new({args})"));
        }
        writeln!(
            code,
            "/// Glyph metrics of the {family} family\n\
             #[allow(clippy::unreadable_literal)]\n\
             pub const {table}: phf::Map<u32, CharacterMetrics> = {};\n",
            map.build()
        )
        .ok();
    }

    writeln!(
        code,
        "/// Glyph tables by font family name\n\
         pub const FONT_METRICS_INDEX: phf::Map<&'static str, &'static phf::Map<u32, CharacterMetrics>> = {};",
        index.build()
    )
    .ok();
    code
}
