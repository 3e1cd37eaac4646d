//! Common box construction helpers
//!
//! The centerpiece is [`make_v_box`], which stacks boxes and kerns vertically
//! according to one of five anchoring strategies. The other helpers build the
//! small boxes constructs need: rules, struts and horizontal gaps.

use crate::box_tree::{BoxContent, BoxType, LayoutBox};
use crate::options::Options;
use crate::types::{CssProperty, CssStyle, LayoutError, LayoutErrorKind};
use crate::units::make_em;

/// Element of a vertical list
#[derive(Debug, Clone, bon::Builder)]
pub struct VBoxElem {
    /// The box to stack
    pub elem: LayoutBox,
    /// Downward displacement of the baseline, for individual shifts
    #[builder(default)]
    pub shift: f64,
    /// Extra left margin in ems
    pub margin_left: Option<f64>,
    /// Extra right margin in ems
    pub margin_right: Option<f64>,
    /// Classes of the wrapper placed around the element
    #[builder(default)]
    pub wrapper_classes: Vec<String>,
    /// Style of the wrapper placed around the element
    pub wrapper_style: Option<CssStyle>,
}

impl From<LayoutBox> for VBoxElem {
    fn from(elem: LayoutBox) -> Self {
        Self::builder().elem(elem).build()
    }
}

/// Kern element for vertical list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VBoxKern {
    /// Size of the kern
    pub size: f64,
}

impl From<f64> for VBoxKern {
    fn from(size: f64) -> Self {
        Self { size }
    }
}

/// Child element in vertical list (either elem or kern)
#[derive(Debug, Clone)]
pub enum VBoxChild {
    /// Element child
    Elem(Box<VBoxElem>),
    /// Kern child
    Kern(VBoxKern),
}

impl VBoxChild {
    /// A kern of `size` ems.
    #[must_use]
    pub const fn kern(size: f64) -> Self {
        Self::Kern(VBoxKern { size })
    }

    fn size(&self) -> f64 {
        match self {
            Self::Kern(kern) => kern.size,
            Self::Elem(elem) => elem.elem.height + elem.elem.depth,
        }
    }
}

impl From<VBoxElem> for VBoxChild {
    fn from(elem: VBoxElem) -> Self {
        Self::Elem(Box::new(elem))
    }
}

impl From<LayoutBox> for VBoxChild {
    fn from(elem: LayoutBox) -> Self {
        Self::Elem(Box::new(elem.into()))
    }
}

/// Parameters for [`make_v_box`]
#[derive(Debug, Clone)]
pub enum VBoxParam {
    /// Each element carries its own baseline shift
    IndividualShift(Vec<VBoxElem>),
    /// The top of the stack sits at `position` above the baseline
    Top {
        /// Height of the topmost point
        position: f64,
        /// The child elements, bottom to top
        children: Vec<VBoxChild>,
    },
    /// The bottom of the stack sits at `position` below the baseline
    Bottom {
        /// Depth of the bottommost point
        position: f64,
        /// The child elements, bottom to top
        children: Vec<VBoxChild>,
    },
    /// The first child's baseline sits at `position` below the baseline
    Shift {
        /// Downward shift of the first child
        position: f64,
        /// The child elements, bottom to top
        children: Vec<VBoxChild>,
    },
    /// The baseline is the first child's baseline
    FirstBaseline(Vec<VBoxChild>),
}

impl VBoxParam {
    const fn variant_name(&self) -> &'static str {
        match self {
            Self::IndividualShift(_) => "individual-shift",
            Self::Top { .. } => "top",
            Self::Bottom { .. } => "bottom",
            Self::Shift { .. } => "shift",
            Self::FirstBaseline(_) => "first-baseline",
        }
    }
}

/// Result of [`get_v_box_children_and_depth`]
#[derive(Debug)]
pub struct VBoxChildrenAndDepth {
    /// Children, bottom to top, with kerns made explicit
    pub children: Vec<VBoxChild>,
    /// Position of the bottom of the stack relative to the baseline,
    /// measured upward
    pub depth: f64,
}

/// Computes the children list and the depth anchor of a vertical list.
pub fn get_v_box_children_and_depth(
    params: VBoxParam,
) -> Result<VBoxChildrenAndDepth, LayoutError> {
    let variant = params.variant_name();
    match params {
        VBoxParam::IndividualShift(old_children) => {
            let mut old_children = old_children.into_iter();
            let first = old_children
                .next()
                .ok_or(LayoutErrorKind::EmptyVBox { variant })?;

            let depth = -first.shift - first.elem.depth;
            let mut curr_pos = depth;
            let mut prev_size = first.elem.height + first.elem.depth;
            let mut children = vec![VBoxChild::from(first)];

            // Add in kerns to get each element to its specified shift
            for child in old_children {
                let diff = -child.shift - curr_pos - child.elem.depth;
                curr_pos += diff;
                children.push(VBoxChild::kern(diff - prev_size));
                prev_size = child.elem.height + child.elem.depth;
                children.push(child.into());
            }

            Ok(VBoxChildrenAndDepth { children, depth })
        }
        VBoxParam::Top { position, children } => {
            if children.is_empty() {
                return Err(LayoutErrorKind::EmptyVBox { variant }.into());
            }
            // We always start at the bottom, so calculate the bottom by
            // adding up all the sizes
            let depth = children
                .iter()
                .fold(position, |bottom, child| bottom - child.size());
            Ok(VBoxChildrenAndDepth { children, depth })
        }
        VBoxParam::Bottom { position, children } => {
            if children.is_empty() {
                return Err(LayoutErrorKind::EmptyVBox { variant }.into());
            }
            Ok(VBoxChildrenAndDepth {
                children,
                depth: -position,
            })
        }
        VBoxParam::Shift { position, children } => {
            let first_depth = first_elem_depth(&children, variant)?;
            Ok(VBoxChildrenAndDepth {
                children,
                depth: -first_depth - position,
            })
        }
        VBoxParam::FirstBaseline(children) => {
            let first_depth = first_elem_depth(&children, variant)?;
            Ok(VBoxChildrenAndDepth {
                children,
                depth: -first_depth,
            })
        }
    }
}

fn first_elem_depth(children: &[VBoxChild], variant: &'static str) -> Result<f64, LayoutError> {
    match children.first() {
        Some(VBoxChild::Elem(elem)) => Ok(elem.elem.depth),
        Some(VBoxChild::Kern(_)) => Err(LayoutErrorKind::VBoxFirstChildIsKern { variant }.into()),
        None => Err(LayoutErrorKind::EmptyVBox { variant }.into()),
    }
}

/// Makes a vertical list by stacking elements and kerns on top of each other.
///
/// Every element is placed in a wrapper that carries a phantom strut taller
/// than any list item plus its `top` offset. When the stack reaches below
/// the baseline a second, zero-width row carries the depth.
pub fn make_v_box(params: VBoxParam, options: &Options) -> Result<LayoutBox, LayoutError> {
    let VBoxChildrenAndDepth { children, depth } = get_v_box_children_and_depth(params)?;

    // A phantom strut taller than any list item
    let pstrut_size = children
        .iter()
        .filter_map(|child| match child {
            VBoxChild::Elem(elem) => Some(elem.elem.max_font_size.max(elem.elem.height)),
            VBoxChild::Kern(_) => None,
        })
        .fold(0.0f64, f64::max)
        + 2.0;
    let mut pstrut = LayoutBox::with_class("pstrut");
    pstrut.set_style(CssProperty::Height, make_em(pstrut_size));

    let mut real_children = Vec::with_capacity(children.len());
    let mut min_pos = depth;
    let mut max_pos = depth;
    let mut curr_pos = depth;
    let mut width = 0.0f64;
    let mut max_font_size = 0.0f64;

    for child in children {
        match child {
            VBoxChild::Kern(kern) => {
                curr_pos += kern.size;
            }
            VBoxChild::Elem(child) => {
                let VBoxElem {
                    elem,
                    margin_left,
                    margin_right,
                    wrapper_classes,
                    wrapper_style,
                    ..
                } = *child;
                let elem_height = elem.height;
                let elem_depth = elem.depth;
                let elem_width = elem.left + elem.width + elem.margin_right;
                max_font_size = max_font_size.max(elem.max_font_size);

                let mut wrapper = LayoutBox::new(vec![pstrut.clone(), elem], BoxType::Ignore);
                wrapper.classes = wrapper_classes;
                if let Some(style) = wrapper_style {
                    wrapper.style = style;
                }
                wrapper.height = elem_height;
                wrapper.depth = elem_depth;
                wrapper.width = elem_width;
                wrapper.left = margin_left.unwrap_or(0.0);
                wrapper.margin_right = margin_right.unwrap_or(0.0);
                wrapper.set_style(
                    CssProperty::Top,
                    make_em(-pstrut_size - curr_pos - elem_depth),
                );
                width = width.max(wrapper.left + elem_width + wrapper.margin_right);

                real_children.push(wrapper);
                curr_pos += elem_height + elem_depth;
            }
        }
        min_pos = min_pos.min(curr_pos);
        max_pos = max_pos.max(curr_pos);
    }

    let mut vlist = LayoutBox::new(real_children, BoxType::Ignore).add_class("vlist");
    vlist.set_style(CssProperty::Height, make_em(max_pos));
    vlist.height = max_pos;
    vlist.width = width;

    let rows = if min_pos < 0.0 {
        // Second row carries the depth below the baseline
        let mut depth_strut = LayoutBox::with_class("vlist");
        depth_strut.set_style(CssProperty::Height, make_em(-min_pos));
        depth_strut.depth = -min_pos;

        let mut top_row = LayoutBox::new(
            vec![vlist, LayoutBox::with_class("vlist-s")],
            BoxType::Ignore,
        )
        .add_class("vlist-r");
        top_row.depth = 0.0;
        let bottom_row = LayoutBox::new(vec![depth_strut], BoxType::Ignore).add_class("vlist-r");
        vec![top_row, bottom_row]
    } else {
        vec![LayoutBox::new(vec![vlist], BoxType::Ignore).add_class("vlist-r")]
    };

    let mut vtable = LayoutBox::empty(BoxType::Ord).add_class("vlist-t");
    if rows.len() == 2 {
        vtable.push_class("vlist-t2");
    }
    vtable.content = BoxContent::Children(rows);
    vtable.height = max_pos;
    vtable.depth = (-min_pos).max(0.0);
    vtable.width = width;
    vtable.max_font_size = max_font_size;
    vtable.is_tight = options.is_tight();
    Ok(vtable)
}

/// A horizontal rule of the given thickness, sitting on the baseline.
///
/// The thickness is raised to the minimum rule thickness of `options`.
#[must_use]
pub fn make_rule(class_name: &str, thickness: f64, width: f64, options: &Options) -> LayoutBox {
    let mut line = LayoutBox::with_class(class_name);
    line.box_type = BoxType::Ord;
    line.height = thickness.max(options.min_rule_thickness);
    line.width = width;
    line.max_font_size = 1.0;
    line.set_style(CssProperty::Height, make_em(line.height));
    line
}

/// An invisible box of the given height and depth.
#[must_use]
pub fn make_strut(height: f64, depth: f64) -> LayoutBox {
    let mut strut = LayoutBox::with_class("ML__strut");
    strut.height = height;
    strut.depth = depth;
    strut.set_style(CssProperty::Height, make_em(height + depth));
    if depth > 0.0 {
        strut.set_style(CssProperty::VerticalAlign, make_em(-depth));
    }
    strut
}

/// A horizontal gap of `width` ems that does not take part in spacing.
#[must_use]
pub fn make_gap(width: f64) -> LayoutBox {
    let mut gap = LayoutBox::with_class("arraycolsep");
    gap.width = width;
    gap.set_style(CssProperty::Width, make_em(width));
    gap
}
