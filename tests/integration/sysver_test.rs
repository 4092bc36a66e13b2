//! Reading the NVer and CVer records.

use super::common::{cver_11_17, nver_50};
use ctr_common::result::ResultCode;
use ctr_os::sim::MemoryVersionStorage;
use ctr_os::sysver::{
    system_version_data, version_result_code, SystemRegion, VersionBin, VersionError,
    VersionRecord,
};

#[test]
fn test_reads_both_records() {
    let mut storage = MemoryVersionStorage::new(nver_50(), cver_11_17());
    let result = system_version_data(&mut storage);
    assert_eq!(version_result_code(&result), 0);

    let data = result.unwrap();
    assert_eq!(data.cver.mainver, 11);
    assert_eq!(data.cver.minor, 17);
    assert_eq!(data.nver.mainver, 50);
    assert_eq!(data.nver.region_char(), 'E');
    assert_eq!(storage.reads(), [VersionRecord::NVer, VersionRecord::CVer]);
}

#[test]
fn test_io_failure_is_positive() {
    let mut storage = MemoryVersionStorage::new(nver_50(), cver_11_17());
    storage.fail(VersionError::Io {
        record: VersionRecord::CVer,
        errno: 5,
    });
    let result = system_version_data(&mut storage);
    assert_eq!(version_result_code(&result), 5);
}

#[test]
fn test_platform_failure_is_negative_and_stops_early() {
    let code = ResultCode::from_raw(0xC8A0_4555);
    let mut storage = MemoryVersionStorage::new(nver_50(), cver_11_17());
    storage.fail(VersionError::Platform {
        record: VersionRecord::NVer,
        code,
    });

    let result = system_version_data(&mut storage);
    assert!(version_result_code(&result) < 0);
    assert_eq!(version_result_code(&result), code.0);
    assert_eq!(storage.reads(), [VersionRecord::NVer]);
}

#[test]
fn test_truncated_record() {
    let mut storage = MemoryVersionStorage::new(nver_50(), cver_11_17());
    storage.set_raw(VersionRecord::CVer, vec![0, 17, 11]);

    let err = system_version_data(&mut storage).unwrap_err();
    assert_eq!(
        err,
        VersionError::ShortRead {
            record: VersionRecord::CVer,
            len: 3
        }
    );
    assert_eq!(err.raw(), -9);
}

#[test]
fn test_record_layout() {
    let bytes = cver_11_17().to_bytes();
    assert_eq!(bytes.len(), VersionBin::SIZE);
    assert_eq!(bytes[..5], [0, 17, 11, 0, b'E']);
    assert_eq!(
        VersionRecord::NVer.title_id(SystemRegion::Europe),
        VersionRecord::NVer.title_id(SystemRegion::Australia)
    );
}

#[test]
fn test_json_export() {
    let mut storage = MemoryVersionStorage::new(nver_50(), cver_11_17());
    let data = system_version_data(&mut storage).unwrap();
    let json = serde_json::to_value(data).unwrap();
    assert_eq!(json["cver"]["mainver"], 11);
    assert_eq!(json["nver"]["region"], u64::from(b'E'));
}
