use super::*;

#[test]
fn cpu_from_str_test() {
    assert_eq!(1_000, "1".parse::<CpuQuantity>().unwrap().millis);
    assert_eq!(100, "100m".parse::<CpuQuantity>().unwrap().millis);
    assert_eq!(500, "0.5".parse::<CpuQuantity>().unwrap().millis);
    assert_eq!(2, "1500u".parse::<CpuQuantity>().unwrap().millis);
    assert_eq!(157, "156340991n".parse::<CpuQuantity>().unwrap().millis);

    assert!("cpu".parse::<CpuQuantity>().is_err());
    assert!("100Mi".parse::<CpuQuantity>().is_err());
}

#[test]
fn memory_from_str_test() {
    assert_eq!(555, "555".parse::<MemoryQuantity>().unwrap().bytes);
    assert_eq!(100_000, "100k".parse::<MemoryQuantity>().unwrap().bytes);
    assert_eq!(1_000_000, "1M".parse::<MemoryQuantity>().unwrap().bytes);
    assert_eq!(250_000_000_000, "250Gb".parse::<MemoryQuantity>().unwrap().bytes);

    assert_eq!(102_400, "100KiB".parse::<MemoryQuantity>().unwrap().bytes);
    assert_eq!(17_825_792, "17Mi".parse::<MemoryQuantity>().unwrap().bytes);
    assert_eq!(1_610_612_736, "1.5Gi".parse::<MemoryQuantity>().unwrap().bytes);

    assert!("many".parse::<MemoryQuantity>().is_err());
    assert!("".parse::<MemoryQuantity>().is_err());
}

#[test]
fn absent_quantity_is_zero_test() {
    assert_eq!(0, cpu_millis(None).unwrap());
    assert_eq!(0, memory_bytes(None).unwrap());

    assert_eq!(250, cpu_millis(Some(&Quantity("250m".into()))).unwrap());
    assert_eq!(134_217_728, memory_bytes(Some(&Quantity("128Mi".into()))).unwrap());

    assert!(cpu_millis(Some(&Quantity("x".into()))).is_err());
    assert!(memory_bytes(Some(&Quantity("x".into()))).is_err());
}
