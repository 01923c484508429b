use rosserial_stm32::{
    Config, Error, Exporter, MessageGenerator, PackageLocator, Result, TypeMap,
};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Locator answering from a fixed table
struct FakeLocator {
    packages: HashMap<String, PathBuf>,
}

impl PackageLocator for FakeLocator {
    fn package_path(&self, name: &str) -> Result<PathBuf> {
        self.packages
            .get(name)
            .cloned()
            .ok_or_else(|| Error::PackageNotFound(name.to_string()))
    }
}

/// Generator writing one header per message, failing on unknown field types
struct FakeGenerator {
    messages: Vec<(&'static str, Vec<&'static str>)>,
    calls: RefCell<Vec<&'static str>>,
}

impl FakeGenerator {
    fn new(messages: Vec<(&'static str, Vec<&'static str>)>) -> Self {
        Self {
            messages,
            calls: RefCell::new(Vec::new()),
        }
    }

    fn std_msgs() -> Self {
        Self::new(vec![
            ("std_msgs/Header", vec!["uint32", "time", "string"]),
            ("std_msgs/UInt16", vec!["uint16"]),
            ("sensor_msgs/Imu", vec!["Header", "float64", "float64"]),
        ])
    }
}

impl MessageGenerator for FakeGenerator {
    fn copy_files(&self, locator: &dyn PackageLocator, output: &Path) -> Result<()> {
        self.calls.borrow_mut().push("copy_files");
        locator.package_path("rosserial_client")?;
        write(&output.join("ros/node_handle.h"), "// node handle\n");
        write(&output.join("time.cpp"), "// time\n");
        write(&output.join("duration.cpp"), "// duration\n");
        Ok(())
    }

    fn generate(
        &self,
        _locator: &dyn PackageLocator,
        output: &Path,
        types: &TypeMap,
    ) -> Result<()> {
        self.calls.borrow_mut().push("generate");
        for (name, fields) in &self.messages {
            types.check_coverage(fields.iter().copied())?;
            let body: String = fields
                .iter()
                .map(|field| format!("{};\n", types.resolve(field).unwrap().target_type))
                .collect();
            write(&output.join(format!("{name}.h")), &body);
        }
        Ok(())
    }
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Relative path -> content for every file under `dir`
fn snapshot(dir: &Path) -> BTreeMap<PathBuf, String> {
    fn walk(base: &Path, dir: &Path, out: &mut BTreeMap<PathBuf, String>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(base, &path, out);
            } else {
                let rel = path.strip_prefix(base).unwrap().to_path_buf();
                out.insert(rel, fs::read_to_string(&path).unwrap());
            }
        }
    }
    let mut out = BTreeMap::new();
    if dir.exists() {
        walk(dir, dir, &mut out);
    }
    out
}

struct Fixture {
    _tmp: TempDir,
    root: PathBuf,
    locator: FakeLocator,
}

impl Fixture {
    /// Project with `Core/Inc`, optionally `Core/Src`, and installed packages
    fn new(with_src: bool) -> Self {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("blinky");
        fs::create_dir_all(root.join("Core/Inc")).unwrap();
        if with_src {
            fs::create_dir_all(root.join("Core/Src")).unwrap();
        }

        let stm32_pkg = tmp.path().join("share/rosserial_stm32");
        write(
            &stm32_pkg.join("src/ros_lib/ros.h"),
            "typedef NodeHandle_<STM32Hardware> NodeHandle;\n",
        );
        write(
            &stm32_pkg.join("src/ros_lib/STM32Hardware.h"),
            "class STM32Hardware {};\n",
        );
        let client_pkg = tmp.path().join("share/rosserial_client");
        fs::create_dir_all(&client_pkg).unwrap();

        let locator = FakeLocator {
            packages: HashMap::from([
                ("rosserial_stm32".to_string(), stm32_pkg),
                ("rosserial_client".to_string(), client_pkg),
            ]),
        };
        Self {
            _tmp: tmp,
            root,
            locator,
        }
    }

    fn output(&self) -> PathBuf {
        self.root.join("Core/Inc/ROSLib")
    }

    fn src_dest(&self) -> PathBuf {
        self.root.join("Core/Src/ROSLib")
    }
}

#[test]
fn test_export_stages_generates_and_relocates() {
    let fixture = Fixture::new(true);
    let config = Config::default();
    let generator = FakeGenerator::std_msgs();
    let types = TypeMap::stm32();

    let report = Exporter::new(&config, &fixture.locator, &generator, &types)
        .export(&fixture.root)
        .unwrap();

    assert_eq!(*generator.calls.borrow(), vec!["copy_files", "generate"]);
    assert_eq!(report.output, fixture.output());
    assert_eq!(report.src_dest, fixture.src_dest());
    assert_eq!(
        report.relocated,
        vec![
            fixture.src_dest().join("duration.cpp"),
            fixture.src_dest().join("time.cpp"),
        ]
    );

    let headers = snapshot(&fixture.output());
    let mut names: Vec<_> = headers.keys().map(|p| p.to_str().unwrap()).collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "STM32Hardware.h",
            "ros.h",
            "ros/node_handle.h",
            "sensor_msgs/Imu.h",
            "std_msgs/Header.h",
            "std_msgs/UInt16.h",
        ]
    );
    assert_eq!(
        headers[Path::new("ros.h")],
        "typedef NodeHandle_<STM32Hardware> NodeHandle;\n"
    );
    assert_eq!(
        headers[Path::new("sensor_msgs/Imu.h")],
        "std_msgs::Header;\ndouble;\ndouble;\n"
    );

    let sources = snapshot(&fixture.src_dest());
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[Path::new("time.cpp")], "// time\n");
}

#[test]
fn test_missing_core_inc_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let fixture = Fixture::new(true);
    let root = tmp.path().join("not_a_project");
    fs::create_dir_all(root.join("Core/Src")).unwrap();
    let before = snapshot(&root);

    let config = Config::default();
    let generator = FakeGenerator::std_msgs();
    let types = TypeMap::stm32();
    let err = Exporter::new(&config, &fixture.locator, &generator, &types)
        .export(&root)
        .unwrap_err();

    match err {
        Error::CoreIncMissing(path) => assert_eq!(path, root.join("Core").join("Inc")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(generator.calls.borrow().is_empty());
    assert_eq!(snapshot(&root), before);
    assert!(!root.join("Core/Inc").exists());
}

#[test]
fn test_missing_src_leaves_sources_in_output() {
    let fixture = Fixture::new(false);
    let config = Config::default();
    let generator = FakeGenerator::std_msgs();
    let types = TypeMap::stm32();

    let err = Exporter::new(&config, &fixture.locator, &generator, &types)
        .export(&fixture.root)
        .unwrap_err();

    match err {
        Error::SrcMissing(path) => assert_eq!(path, fixture.root.join("Core/Src")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(*generator.calls.borrow(), vec!["copy_files", "generate"]);
    assert!(fixture.output().join("time.cpp").is_file());
    assert!(fixture.output().join("duration.cpp").is_file());
    assert!(fixture.output().join("std_msgs/Header.h").is_file());
    assert!(!fixture.root.join("Core/Src").exists());
}

#[test]
fn test_export_is_idempotent() {
    let fixture = Fixture::new(true);
    let config = Config::default();
    let types = TypeMap::stm32();

    let generator = FakeGenerator::std_msgs();
    let exporter = Exporter::new(&config, &fixture.locator, &generator, &types);
    exporter.export(&fixture.root).unwrap();
    let first = (snapshot(&fixture.output()), snapshot(&fixture.src_dest()));

    exporter.export(&fixture.root).unwrap();
    let second = (snapshot(&fixture.output()), snapshot(&fixture.src_dest()));

    assert_eq!(first, second);
    assert!(!first.1.is_empty());
}

#[test]
fn test_stale_output_is_replaced() {
    let fixture = Fixture::new(true);
    write(&fixture.output().join("old_msgs/Removed.h"), "// stale\n");
    write(&fixture.output().join("stale.cpp"), "// stale\n");

    let config = Config::default();
    let generator = FakeGenerator::std_msgs();
    let types = TypeMap::stm32();
    let report = Exporter::new(&config, &fixture.locator, &generator, &types)
        .export(&fixture.root)
        .unwrap();

    assert!(!fixture.output().join("old_msgs").exists());
    assert!(!fixture.src_dest().join("stale.cpp").exists());
    assert_eq!(report.relocated.len(), 2);
}

#[test]
fn test_stale_output_file_aborts_export() {
    let fixture = Fixture::new(true);
    fs::write(fixture.output(), "not a directory\n").unwrap();

    let config = Config::default();
    let generator = FakeGenerator::std_msgs();
    let types = TypeMap::stm32();
    let err = Exporter::new(&config, &fixture.locator, &generator, &types)
        .export(&fixture.root)
        .unwrap_err();

    assert!(matches!(err, Error::StaleOutput { ref path, .. } if *path == fixture.output()));
    assert!(fixture.output().is_file());
    assert!(generator.calls.borrow().is_empty());
    assert!(!fixture.src_dest().exists());
}

#[test]
fn test_unknown_wire_type_fails_generation() {
    let fixture = Fixture::new(true);
    let config = Config::default();
    let generator = FakeGenerator::new(vec![("custom_msgs/Wide", vec!["wstring"])]);
    let types = TypeMap::stm32();

    let err = Exporter::new(&config, &fixture.locator, &generator, &types)
        .export(&fixture.root)
        .unwrap_err();

    assert!(matches!(err, Error::UnknownWireType(ref name) if name == "wstring"));
    assert!(!fixture.output().join("custom_msgs/Wide.h").exists());
    assert!(!fixture.src_dest().exists());
}

#[test]
fn test_missing_runtime_package_writes_nothing() {
    let mut fixture = Fixture::new(true);
    fixture.locator.packages.remove("rosserial_stm32");

    let config = Config::default();
    let generator = FakeGenerator::std_msgs();
    let types = TypeMap::stm32();
    let err = Exporter::new(&config, &fixture.locator, &generator, &types)
        .export(&fixture.root)
        .unwrap_err();

    assert!(matches!(err, Error::PackageNotFound(ref name) if name == "rosserial_stm32"));
    assert!(!fixture.output().exists());
    assert!(generator.calls.borrow().is_empty());
}

#[test]
fn test_runtime_lib_override() {
    let fixture = Fixture::new(true);
    let custom = fixture.root.join("vendor/ros_lib");
    write(&custom.join("ros.h"), "// custom\n");

    let config = Config::builder().runtime_lib(&custom).build();
    let generator = FakeGenerator::std_msgs();
    let types = TypeMap::stm32();
    Exporter::new(&config, &fixture.locator, &generator, &types)
        .export(&fixture.root)
        .unwrap();

    assert_eq!(
        fs::read_to_string(fixture.output().join("ros.h")).unwrap(),
        "// custom\n"
    );
    assert!(!fixture.output().join("STM32Hardware.h").exists());

    let missing = Config::builder()
        .runtime_lib(fixture.root.join("vendor/nothing"))
        .build();
    let err = Exporter::new(&missing, &fixture.locator, &generator, &types)
        .export(&fixture.root)
        .unwrap_err();
    assert!(matches!(err, Error::RuntimeLibMissing(_)));
}

#[test]
fn test_custom_source_extension() {
    let fixture = Fixture::new(true);
    let config = Config::builder().source_extension("h").build();
    let generator = FakeGenerator::new(vec![]);
    let types = TypeMap::stm32();

    let report = Exporter::new(&config, &fixture.locator, &generator, &types)
        .export(&fixture.root)
        .unwrap();

    // Only top-level headers move, nested ones stay
    assert_eq!(
        report.relocated,
        vec![
            fixture.src_dest().join("STM32Hardware.h"),
            fixture.src_dest().join("ros.h"),
        ]
    );
    assert!(fixture.output().join("ros/node_handle.h").is_file());
    assert!(fixture.output().join("time.cpp").is_file());
}
