//! LaTeX serialization of atoms
//!
//! The serialized form is memoized on each atom and dropped whenever the atom
//! or one of its descendants changes.

use alloc::borrow::Cow;

use crate::types::LayoutError;

use super::{
    AccentMark, Atom, AtomId, AtomKind, AtomTree, BranchName, ColumnAlign, ColumnFormat,
    OverlapAlign, SeparatorStyle,
};

impl AtomTree {
    /// LaTeX form of `id` and its subtree.
    pub fn serialize(&self, id: AtomId) -> Result<&str, LayoutError> {
        let atom = self.get(id)?;
        if let Some(cached) = atom.serialized.get() {
            return Ok(cached);
        }
        let latex = self.atom_to_latex(atom)?;
        Ok(atom.serialized.get_or_init(|| latex))
    }

    /// LaTeX form of a list of atoms, sentinels skipped.
    pub fn serialize_list(&self, list: &[AtomId]) -> Result<String, LayoutError> {
        let mut out = String::new();
        for &id in list {
            join_latex(&mut out, self.serialize(id)?);
        }
        Ok(out)
    }

    fn branch_latex(&self, atom: &Atom, name: BranchName) -> Result<String, LayoutError> {
        atom.branch(name)
            .map_or_else(|| Ok(String::new()), |list| self.serialize_list(list))
    }

    fn atom_to_latex(&self, atom: &Atom) -> Result<String, LayoutError> {
        let command = atom.command.as_deref();
        let mut out = match &atom.kind {
            AtomKind::First => String::new(),
            AtomKind::Placeholder => "\\placeholder{}".to_owned(),
            AtomKind::Ord
            | AtomKind::Bin
            | AtomKind::Rel
            | AtomKind::Open
            | AtomKind::Close
            | AtomKind::Punct
            | AtomKind::Inner
            | AtomKind::Op(_)
            | AtomKind::Error => command.or(atom.value()).unwrap_or_default().to_owned(),
            AtomKind::Infix { command } => command.clone(),
            AtomKind::Spacing(measurement) => command.map_or_else(
                || format!("\\hspace{{{measurement}}}"),
                str::to_owned,
            ),
            AtomKind::Group => format!("{{{}}}", self.branch_latex(atom, BranchName::Body)?),
            AtomKind::Genfrac(options) => {
                let numer = self.branch_latex(atom, BranchName::Above)?;
                let denom = self.branch_latex(atom, BranchName::Below)?;
                let prefix = options.numer_prefix.as_deref().unwrap_or_default();
                let mut numer_with_prefix = String::from(prefix);
                join_latex(&mut numer_with_prefix, &numer);
                format!(
                    "{}{{{numer_with_prefix}}}{{{denom}}}",
                    command.unwrap_or("\\frac")
                )
            }
            AtomKind::Accent(options) => {
                let default = match &options.accent {
                    AccentMark::Stretchy(name) => Cow::Owned(format!("\\{name}")),
                    AccentMark::Char(_) => Cow::Borrowed("\\hat"),
                };
                format!(
                    "{}{{{}}}",
                    command.unwrap_or(&*default),
                    self.branch_latex(atom, BranchName::Body)?
                )
            }
            AtomKind::OverUnder(_) => {
                let mut out = command.unwrap_or("\\overset").to_owned();
                for name in [BranchName::Above, BranchName::Below, BranchName::Body] {
                    if atom.branch(name).is_some() {
                        out.push('{');
                        out.push_str(&self.branch_latex(atom, name)?);
                        out.push('}');
                    }
                }
                out
            }
            AtomKind::Overlap(options) => {
                let default = match options.align {
                    OverlapAlign::Left => "\\llap",
                    OverlapAlign::Right => "\\rlap",
                    OverlapAlign::Center => "\\clap",
                };
                format!(
                    "{}{{{}}}",
                    command.unwrap_or(default),
                    self.branch_latex(atom, BranchName::Body)?
                )
            }
            AtomKind::Phantom(_) => format!(
                "{}{{{}}}",
                command.unwrap_or("\\phantom"),
                self.branch_latex(atom, BranchName::Body)?
            ),
            AtomKind::Array(options) => {
                let mut out = format!("\\begin{{{}}}", options.environment);
                if options.environment == "array" {
                    out.push('{');
                    out.push_str(&column_spec(&options.col_format));
                    out.push('}');
                }
                let mut rows = Vec::new();
                for row in atom.grid().unwrap_or_default() {
                    let cells = row
                        .iter()
                        .map(|cell| self.serialize_list(cell))
                        .collect::<Result<Vec<_>, _>>()?;
                    rows.push(cells.join(" & "));
                }
                out.push_str(&rows.join(" \\\\ "));
                out.push_str(&format!("\\end{{{}}}", options.environment));
                out
            }
        };

        if atom.branch(BranchName::Superscript).is_some() {
            out.push_str("^{");
            out.push_str(&self.branch_latex(atom, BranchName::Superscript)?);
            out.push('}');
        }
        if atom.branch(BranchName::Subscript).is_some() {
            out.push_str("_{");
            out.push_str(&self.branch_latex(atom, BranchName::Subscript)?);
            out.push('}');
        }
        Ok(out)
    }
}

/// Appends `next` to `out`, with a space when a control word would otherwise
/// run into a letter.
fn join_latex(out: &mut String, next: &str) {
    let ends_with_control_word = {
        let word_start = out.trim_end_matches(|c: char| c.is_ascii_alphabetic());
        word_start.len() < out.len() && word_start.ends_with('\\')
    };
    if ends_with_control_word && next.starts_with(|c: char| c.is_ascii_alphabetic()) {
        out.push(' ');
    }
    out.push_str(next);
}

fn column_spec(format: &[ColumnFormat]) -> String {
    format
        .iter()
        .map(|column| match column {
            ColumnFormat::Align(ColumnAlign::Left) => "l".to_owned(),
            ColumnFormat::Align(ColumnAlign::Center) => "c".to_owned(),
            ColumnFormat::Align(ColumnAlign::Right) => "r".to_owned(),
            ColumnFormat::Separator(SeparatorStyle::Solid) => "|".to_owned(),
            ColumnFormat::Separator(SeparatorStyle::Dashed) => ":".to_owned(),
            ColumnFormat::Gap(em) => format!("@{{\\hspace{{{em}em}}}}"),
        })
        .collect()
}
