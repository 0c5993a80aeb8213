#![allow(clippy::unwrap_used, reason = "allow in test files")]

use super::*;

#[test]
fn round_to_u8_rounds_half_up() {
    assert_eq!(round_to_u8(0.0), 0);
    assert_eq!(round_to_u8(0.49), 0);
    assert_eq!(round_to_u8(0.5), 1);
    assert_eq!(round_to_u8(127.5), 128);
    assert_eq!(round_to_u8(254.6), 255);
}

#[test]
fn round_to_u8_saturates() {
    assert_eq!(round_to_u8(-30.0), 0);
    assert_eq!(round_to_u8(300.0), 255);
    assert_eq!(round_to_u8(f32::INFINITY), 255);
    assert_eq!(round_to_u8(f32::NEG_INFINITY), 0);
    assert_eq!(round_to_u8(f32::NAN), 0);
}

#[test]
fn try_alloc_returns_zeroed_buffer() {
    let buf = try_alloc::<u8>(37).unwrap();
    assert_eq!(buf.len(), 37);
    assert!(buf.iter().all(|&b| b == 0));
}

#[test]
fn try_alloc_reports_impossible_sizes() {
    assert!(try_alloc::<u8>(usize::MAX).is_err());
    assert!(try_alloc::<f32>(usize::MAX / 2).is_err());
}

#[test]
fn try_alloc_fills_with_default() {
    let buf = try_alloc::<f64>(5).unwrap();
    assert_eq!(buf, vec![0.0; 5]);
}

#[test]
fn mip_dimension_floors_and_stops_at_one() {
    assert_eq!(mip_dimension(256), 128);
    assert_eq!(mip_dimension(255), 127);
    assert_eq!(mip_dimension(3), 1);
    assert_eq!(mip_dimension(2), 1);
    assert_eq!(mip_dimension(1), 1);
}

#[test]
fn half_box_dimension_rounds_up() {
    assert_eq!(half_box_dimension(256), 128);
    assert_eq!(half_box_dimension(255), 128);
    assert_eq!(half_box_dimension(3), 2);
    assert_eq!(half_box_dimension(2), 1);
    assert_eq!(half_box_dimension(1), 1);
}
