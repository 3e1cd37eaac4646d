mod setup;
use atom_layout::{
    ArrayOptions, Atom, AtomKind, AtomTree, BoxType, BranchName, ColumnAlign, ColumnFormat,
    GenfracOptions, LayoutBox, LayoutErrorKind, Limits, MathStyle, Measurement, OpOptions,
    Options, Unit, functions::sup_sub_shifts, render,
};
use setup::*;

// Every function is equivalent to a "describe" block

#[test]
fn a_fraction() {
    it("should stack a over b at num1 and denom1 in display style", || {
        let ctx = display_ctx();
        let mut tree = AtomTree::new();
        let a = ord(&mut tree, "a");
        let b = ord(&mut tree, "b");
        let frac = structure(
            &mut tree,
            AtomKind::Genfrac(GenfracOptions::default()),
            vec![(BranchName::Above, vec![a]), (BranchName::Below, vec![b])],
        )?;

        let result = render(ctx, &tree, frac)?;
        let metrics = ctx.root_options().font_metrics();
        assert_eq!(result.box_type, BoxType::Inner);
        // "a" is 0.43056 high, "b" has no depth
        assert_close(result.height, metrics.num1 + 0.43056, "height");
        assert_close(result.depth, metrics.denom1, "depth");
        assert_close(
            result.total_height(),
            metrics.num1 + 0.43056 + metrics.denom1,
            "total height",
        );
        Ok(())
    });

    it("should draw a bar as thick as the default rule", || {
        let ctx = display_ctx();
        let mut tree = AtomTree::new();
        let a = ord(&mut tree, "a");
        let b = ord(&mut tree, "b");
        let frac = structure(
            &mut tree,
            AtomKind::Genfrac(GenfracOptions::default()),
            vec![(BranchName::Above, vec![a]), (BranchName::Below, vec![b])],
        )?;

        let result = render(ctx, &tree, frac)?;
        let metrics = ctx.root_options().font_metrics();
        let Some(rule) = find_class(&result, "ML__frac-line") else {
            panic!("no fraction bar in {result:?}");
        };
        assert_close(
            rule.height + rule.depth,
            metrics.default_rule_thickness,
            "rule thickness",
        );

        // The numerator clears the bar
        let num_shift = result.height - 0.43056;
        assert!(
            num_shift - metrics.default_rule_thickness / 2.0 - metrics.axis_height >= 0.0,
            "numerator overlaps the bar"
        );
        Ok(())
    });

    it("should give the same boxes on every render", || {
        let ctx = display_ctx();
        let mut tree = AtomTree::new();
        let a = ord(&mut tree, "a");
        let b = ord(&mut tree, "b");
        let frac = structure(
            &mut tree,
            AtomKind::Genfrac(GenfracOptions::default()),
            vec![(BranchName::Above, vec![a]), (BranchName::Below, vec![b])],
        )?;
        assert_eq!(render(ctx, &tree, frac)?, render(ctx, &tree, frac)?);
        Ok(())
    });
}

#[test]
fn inter_atom_spacing() {
    it("should turn a leading bin into an ord", || {
        let ctx = default_ctx();
        let mut tree = AtomTree::new();
        let minus = sym(&mut tree, AtomKind::Bin, "-");
        let x = ord(&mut tree, "x");
        let root = group(&mut tree, vec![minus, x])?;

        let result = render(ctx, &tree, root)?;
        let children = result.children();
        assert_eq!(children[0].box_type, BoxType::Ord);
        assert_eq!(children[1].left, 0.0);
        Ok(())
    });

    it("should turn a bin before a close into an ord", || {
        let ctx = default_ctx();
        let mut tree = AtomTree::new();
        let x = ord(&mut tree, "x");
        let plus = sym(&mut tree, AtomKind::Bin, "+");
        let paren = sym(&mut tree, AtomKind::Close, ")");
        let root = group(&mut tree, vec![x, plus, paren])?;

        let result = render(ctx, &tree, root)?;
        let children = result.children();
        assert_eq!(children[1].box_type, BoxType::Ord);
        assert_eq!(children[1].left, 0.0);
        assert_eq!(children[2].left, 0.0);
        Ok(())
    });

    it("should surround a bin with medium spaces", || {
        let ctx = default_ctx();
        let mut tree = AtomTree::new();
        let x = ord(&mut tree, "x");
        let plus = sym(&mut tree, AtomKind::Bin, "+");
        let y = ord(&mut tree, "y");
        let root = group(&mut tree, vec![x, plus, y])?;

        let result = render(ctx, &tree, root)?;
        let medium = Measurement::new(4.0, Unit::Mu).to_em(&ctx.root_options());
        let children = result.children();
        assert_eq!(children[1].box_type, BoxType::Bin);
        assert_close(children[1].left, medium, "space before +");
        assert_close(children[2].left, medium, "space after +");
        Ok(())
    });

    it("should put a thick space before a relation", || {
        let ctx = default_ctx();
        let mut tree = AtomTree::new();
        let x = ord(&mut tree, "x");
        let eq = sym(&mut tree, AtomKind::Rel, "=");
        let y = ord(&mut tree, "y");
        let root = group(&mut tree, vec![x, eq, y])?;

        let result = render(ctx, &tree, root)?;
        let thick = Measurement::new(5.0, Unit::Mu).to_em(&ctx.root_options());
        assert_close(result.children()[1].left, thick, "space before =");
        Ok(())
    });
}

#[test]
fn an_array() {
    it("should fold a long row into the declared columns", || {
        let ctx = default_ctx();
        let mut tree = AtomTree::new();
        let [a, b, c] = ["a", "b", "c"].map(|v| ord(&mut tree, v));
        let options = ArrayOptions::builder()
            .col_format(vec![
                ColumnFormat::Align(ColumnAlign::Center),
                ColumnFormat::Align(ColumnAlign::Center),
            ])
            .build();
        let array = tree.new_array(options, vec![vec![vec![a], vec![b], vec![c]]])?;

        assert_eq!(
            tree.serialize(array)?,
            "\\begin{array}{cc}a & b \\\\ c & \\placeholder{}\\end{array}"
        );
        let result = render(ctx, &tree, array)?;
        assert!(find_class(&result, "mtable").is_some());
        assert!(find_class(&result, "ML__placeholder").is_some());
        Ok(())
    });
}

#[test]
fn scripts() {
    it("should raise a lone superscript by the larger of sup2 and x_height/4", || {
        let options = Options::default();
        let metrics = options.font_metrics();
        let sup = LayoutBox {
            height: 0.5,
            ..LayoutBox::default()
        };
        let shifts = sup_sub_shifts(0.43056, 0.0, Some(&sup), None, &options, true);
        assert_eq!(shifts.sup_shift, metrics.sup2.max(0.25 * metrics.x_height));
        Ok(())
    });

    it("should use sup3 in cramped styles", || {
        let options = Options::default().having_cramped_style();
        let metrics = options.font_metrics();
        let sup = LayoutBox::default();
        let shifts = sup_sub_shifts(0.43056, 0.0, Some(&sup), None, &options, true);
        assert_eq!(shifts.sup_shift, metrics.sup3.max(0.25 * metrics.x_height));
        Ok(())
    });

    it("should attach scripts to a letter", || {
        let ctx = default_ctx();
        let mut tree = AtomTree::new();
        let x = ord(&mut tree, "x");
        let two = ord(&mut tree, "2");
        tree.append(x, BranchName::Superscript, two)?;
        let root = group(&mut tree, vec![x])?;

        let result = render(ctx, &tree, root)?;
        let glyph = LayoutBox::text("x", "Math-Italic", BoxType::Ord, &ctx.font_metrics);
        assert_eq!(result.children().len(), 1);
        assert!(result.height > glyph.height);
        assert!(result.width > glyph.width);
        Ok(())
    });
}

#[test]
fn a_big_operator() {
    fn sum(tree: &mut AtomTree) -> atom_layout::AtomId {
        let op = OpOptions {
            limits: Limits::Auto,
            large: true,
        };
        tree.add(Atom::symbol(AtomKind::Op(op), "\u{2211}"))
    }

    it("should stack limits above the symbol in display style", || {
        let ctx = display_ctx();
        let mut tree = AtomTree::new();
        let bare = sum(&mut tree);
        let base_height = render(ctx, &tree, bare)?.height;

        let op = sum(&mut tree);
        let n = ord(&mut tree, "n");
        tree.append(op, BranchName::Superscript, n)?;
        let result = render(ctx, &tree, op)?;

        let metrics = ctx.root_options().font_metrics();
        assert!(result.has_class("op-limits"));
        assert_eq!(result.box_type, BoxType::Op);
        assert!(result.height >= base_height + metrics.big_op_spacing1 + metrics.big_op_spacing5);
        Ok(())
    });

    it("should keep scripts at the side in text style", || {
        let ctx = default_ctx();
        let mut tree = AtomTree::new();
        let op = sum(&mut tree);
        let n = ord(&mut tree, "n");
        tree.append(op, BranchName::Superscript, n)?;

        let result = render(ctx, &tree, op)?;
        assert!(!result.has_class("op-limits"));
        assert_eq!(result.box_type, BoxType::Op);
        Ok(())
    });
}

#[test]
fn an_atom_tree() {
    it("should refuse to attach an atom twice", || {
        let mut tree = AtomTree::new();
        let x = ord(&mut tree, "x");
        group(&mut tree, vec![x])?;
        let Err(err) = group(&mut tree, vec![x]) else {
            panic!("second attachment was accepted");
        };
        assert!(matches!(*err.kind, LayoutErrorKind::AlreadyAttached { atom } if atom == x));
        assert_eq!(err.atom, Some(x));
        Ok(())
    });

    it("should refuse to attach an atom inside itself", || {
        let mut tree = AtomTree::new();
        let inner = tree.add(Atom::new(AtomKind::Group));
        let outer = group(&mut tree, vec![inner])?;
        let err = tree
            .set_branch(inner, BranchName::Body, vec![outer])
            .err()
            .map(|err| err.kind);
        assert!(matches!(err.as_deref(), Some(LayoutErrorKind::Cycle)));
        Ok(())
    });

    it("should drop stale serializations after a change", || {
        let mut tree = AtomTree::new();
        let x = ord(&mut tree, "x");
        let two = ord(&mut tree, "2");
        tree.append(x, BranchName::Superscript, two)?;
        let root = group(&mut tree, vec![x])?;
        assert_eq!(tree.serialize(root)?, "{x^{2}}");

        tree.set_value(two, "3")?;
        assert_eq!(tree.serialize(root)?, "{x^{3}}");

        let y = ord(&mut tree, "y");
        tree.append(root, BranchName::Body, y)?;
        assert_eq!(tree.serialize(root)?, "{x^{3}y}");
        Ok(())
    });

    it("should count every mutation", || {
        let mut tree = AtomTree::new();
        let mut counters = vec![tree.change_counter()];

        let x = ord(&mut tree, "x");
        let root = group(&mut tree, vec![x])?;
        counters.push(tree.change_counter());
        let y = ord(&mut tree, "y");
        tree.append(root, BranchName::Body, y)?;
        counters.push(tree.change_counter());
        tree.set_value(y, "z")?;
        counters.push(tree.change_counter());
        tree.remove(y)?;
        counters.push(tree.change_counter());
        tree.discard(y)?;
        counters.push(tree.change_counter());

        assert!(counters.windows(2).all(|pair| pair[0] < pair[1]));
        Ok(())
    });

    it("should track dirty atoms up to the root", || {
        let mut tree = AtomTree::new();
        let x = ord(&mut tree, "x");
        let inner = group(&mut tree, vec![x])?;
        let root = group(&mut tree, vec![inner])?;
        tree.mark_clean(root)?;
        assert!(!tree.is_dirty(inner)?);

        tree.set_value(x, "y")?;
        assert!(tree.is_dirty(x)?);
        assert!(tree.is_dirty(inner)?);
        assert!(tree.is_dirty(root)?);
        Ok(())
    });

    it("should report unknown atoms", || {
        let ctx = default_ctx();
        let mut other = AtomTree::new();
        let stray = ord(&mut other, "x");
        let err = render(ctx, &AtomTree::new(), stray)
            .err()
            .map(|err| err.kind);
        assert!(matches!(err.as_deref(), Some(LayoutErrorKind::UnknownAtom { .. })));
        Ok(())
    });
}

#[test]
fn unresolved_constructs() {
    it("should render a leftover infix as an error box", || {
        let ctx = default_ctx();
        let mut tree = AtomTree::new();
        let a = ord(&mut tree, "a");
        let over = tree.add(Atom::new(AtomKind::Infix {
            command: "\\over".to_owned(),
        }));
        let b = ord(&mut tree, "b");
        let root = group(&mut tree, vec![a, over, b])?;

        let result = render(ctx, &tree, root)?;
        let Some(error) = find_class(&result, "ML__error") else {
            panic!("no error box in {result:?}");
        };
        assert_eq!(error.box_type, BoxType::Error);
        assert_eq!(error.value(), Some("\\over"));
        assert!(leaves(&result).len() >= 3);
        Ok(())
    });
}

#[test]
fn style_changes() {
    it("should scale a script-style group", || {
        let ctx = default_ctx();
        let options = ctx.root_options();
        let script = options.having_style(MathStyle::Script);
        let glyph = LayoutBox::text("x", "Math-Italic", BoxType::Ord, &ctx.font_metrics);
        let wrapped = glyph.clone().wrap(&script);
        assert_close(
            wrapped.height,
            glyph.height * script.size_multiplier / options.size_multiplier,
            "scaled height",
        );
        assert_eq!(glyph.clone().wrap(&options), glyph);
        Ok(())
    });
}
