use clap::Parser;
use colored::*;
use kdtree_st::config::LoggingConfig;
use kdtree_st::{KdTree, KdTreeConfig, Point, Rectangle, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, Level};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 配置文件路径
    #[arg(short, long, default_value = "kdtree.toml")]
    config: String,

    /// 生成默认配置文件并退出
    #[arg(long)]
    generate_config: bool,

    /// Number of random points to insert (overrides config file)
    #[arg(short, long)]
    random: Option<usize>,

    /// Random seed (overrides config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (overrides config file)
    #[arg(long)]
    log_level: Option<String>,

    /// Dump the random tree to this snapshot file (enables persistence)
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // 生成默认配置文件
    if args.generate_config {
        let config = KdTreeConfig::default();
        config.save_to_file(&args.config)?;
        println!("✅ Generated default configuration: {}", args.config);
        return Ok(());
    }

    // 加载配置
    let mut config = KdTreeConfig::from_file(&args.config)?;

    // 命令行参数覆盖配置文件
    if let Some(random) = args.random {
        config.workload.random_points = random;
    }
    if let Some(seed) = args.seed {
        config.workload.seed = seed;
    }
    if let Some(log_level) = args.log_level {
        config.logging.level = log_level;
    }
    if let Some(snapshot) = args.snapshot {
        config.persistence.enabled = true;
        config.persistence.snapshot_file = snapshot;
    }

    // 验证配置
    config.validate()?;

    // 初始化日志系统
    init_logging(&config.logging)?;

    info!("📦 kdtree-cli {}", env!("CARGO_PKG_VERSION"));
    config.print_summary();

    let mut failures = run_sample_checks()?;
    failures += run_random_workload(&config)?;

    println!();
    if failures == 0 {
        println!("{}", "All checks passed".green().bold());
        Ok(())
    } else {
        println!("{}", format!("{} check(s) failed", failures).red().bold());
        std::process::exit(1);
    }
}

/// 打印一条检查结果，返回失败数
fn report(name: &str, ok: bool, detail: impl std::fmt::Display) -> usize {
    if ok {
        println!("  {} {} {}", "✔".green(), name, detail.to_string().dimmed());
        0
    } else {
        println!("  {} {} {}", "✘".red(), name, detail.to_string().red());
        1
    }
}

/// 七个点的固定场景
fn run_sample_checks() -> Result<usize> {
    println!("{}", "Sample scenario".cyan().bold());

    let mut tree = KdTree::new();
    let entries = [
        (1.0, 0.125, "A"),
        (0.125, 0.875, "B"),
        (0.75, 0.0, "C"),
        (0.0, 0.375, "D"),
        (0.375, 1.0, "E"),
        (0.25, 0.5, "F"),
        (0.0625, 0.1875, "G"),
    ];
    for (x, y, value) in entries {
        tree.put(Point::new(x, y), value)?;
    }
    debug!("\n{}", tree.structure_string());

    let mut failures = 0;
    failures += report("size", tree.size() == 7, tree.size());
    failures += report("is_empty", !tree.is_empty(), tree.is_empty());
    failures += report(
        "contains (0.375, 1)",
        tree.contains(&Point::new(0.375, 1.0))?,
        "",
    );
    failures += report(
        "contains (0.75, 0)",
        tree.contains(&Point::new(0.75, 0.0))?,
        "",
    );

    let a = tree.get(&Point::new(1.0, 0.125))?.copied();
    failures += report("get (1, 0.125)", a == Some("A"), format!("{:?}", a));
    let d = tree.get(&Point::new(0.0, 0.375))?.copied();
    failures += report("get (0, 0.375)", d == Some("D"), format!("{:?}", d));

    let points: Vec<String> = tree.points().iter().map(|p| p.to_string()).collect();
    println!("  points: {}", points.join(" ").dimmed());

    let query = Rectangle::new(0.5, 0.625, 0.875, 0.75);
    let in_range = tree.range(&query)?;
    failures += report(
        &format!("range {}", query),
        in_range.is_empty(),
        format!("{} point(s)", in_range.len()),
    );

    let target = Point::new(0.79, 0.89);
    match tree.nearest_with_distance(&target)? {
        Some((nearest, distance)) => {
            let ok = nearest == Point::new(0.375, 1.0) && (distance - 0.184325).abs() < 1e-9;
            failures += report(
                &format!("nearest {}", target),
                ok,
                format!("{} at squared distance {}", nearest, distance),
            );
        }
        None => failures += report(&format!("nearest {}", target), false, "empty tree"),
    }

    failures += match tree.check_invariants() {
        Ok(()) => report("invariants", true, ""),
        Err(e) => report("invariants", false, e),
    };

    Ok(failures)
}

/// 随机负载：插入随机点，与暴力扫描比对范围查询和最近邻结果
fn run_random_workload(config: &KdTreeConfig) -> Result<usize> {
    let workload = &config.workload;
    println!();
    println!(
        "{}",
        format!(
            "Random workload ({} points, seed {})",
            workload.random_points, workload.seed
        )
        .cyan()
        .bold()
    );

    let mut rng = StdRng::seed_from_u64(workload.seed);
    let mut tree = KdTree::new();
    let mut all = Vec::with_capacity(workload.random_points);

    let started = Instant::now();
    for i in 0..workload.random_points {
        let p = Point::new(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0));
        if tree.put(p, i)?.is_none() {
            all.push(p);
        }
    }
    info!(
        "inserted {} points in {:?}, height {}",
        tree.size(),
        started.elapsed(),
        tree.height()
    );

    let mut failures = 0;
    failures += report("size", tree.size() == all.len(), tree.size());

    let mut range_mismatches = 0;
    let mut nearest_mismatches = 0;
    let started = Instant::now();
    for _ in 0..workload.queries {
        let x0: f64 = rng.gen_range(0.0..1.0);
        let y0: f64 = rng.gen_range(0.0..1.0);
        let query = Rectangle::new(
            x0,
            y0,
            x0 + rng.gen_range(0.0..0.2),
            y0 + rng.gen_range(0.0..0.2),
        );
        let found = tree.range(&query)?.len();
        let expected = all.iter().filter(|p| query.contains_point(p)).count();
        if found != expected {
            range_mismatches += 1;
        }

        let target = Point::new(rng.gen_range(-0.5..1.5), rng.gen_range(-0.5..1.5));
        let best = all
            .iter()
            .map(|p| p.distance_squared_to(&target))
            .fold(f64::INFINITY, f64::min);
        match tree.nearest_with_distance(&target)? {
            Some((_, distance)) if distance == best => {}
            None if all.is_empty() => {}
            _ => nearest_mismatches += 1,
        }
    }
    info!(
        "ran {} range and {} nearest queries in {:?}",
        workload.queries,
        workload.queries,
        started.elapsed()
    );

    failures += report(
        "range vs brute force",
        range_mismatches == 0,
        format!("{} mismatch(es)", range_mismatches),
    );
    failures += report(
        "nearest vs brute force",
        nearest_mismatches == 0,
        format!("{} mismatch(es)", nearest_mismatches),
    );

    if config.persistence.enabled {
        let path = &config.persistence.snapshot_file;
        tree.dump_to_file(path)?;
        let loaded: KdTree<usize> = KdTree::load_from_file(path)?;
        failures += report(
            &format!("snapshot {}", path.display()),
            loaded.points() == tree.points(),
            format!("{} point(s)", loaded.size()),
        );
    }

    Ok(failures)
}

/// 初始化日志系统
fn init_logging(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = match config.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    match (config.output.as_str(), &config.log_file) {
        ("file", Some(log_file)) => {
            // 确保日志目录存在
            if let Some(parent) = log_file.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)?;

            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(file)
                        .with_target(false),
                )
                .with(tracing_subscriber::filter::LevelFilter::from_level(filter))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(tracing_subscriber::fmt::layer().with_target(false))
                .with(tracing_subscriber::filter::LevelFilter::from_level(filter))
                .init();
        }
    }
    Ok(())
}
