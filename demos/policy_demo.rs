use policy_store::{FileMedium, PolicyDraft, PolicyStore};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    // Reopening over the same directory restores the previous run's state.
    let data_dir = std::env::temp_dir().join("policy_demo_data");
    let store = PolicyStore::open(FileMedium::new(&data_dir));
    println!(
        "opened store over {} with {} existing policies",
        data_dir.display(),
        store.count(|_| true)?
    );

    // Create
    let policy = store.add(PolicyDraft {
        policy_number: "POL-001".into(),
        customer_name: "John Doe".into(),
        start_date: "2024-01-01".into(),
        end_date: "2024-12-31".into(),
        premium_amount: 1500.0,
    })?;
    println!("created policy #{}: {:?}", policy.id, policy.policy_number);

    // Read
    for p in store.get_all()? {
        println!(
            "  #{} {} for {} ({} to {}), premium {}",
            p.id, p.policy_number, p.customer_name, p.start_date, p.end_date, p.premium_amount
        );
    }

    // Update
    let mut editing = store.get_by_id(policy.id)?.expect("just created it");
    editing.premium_amount = 1750.0;
    store.update(editing)?;
    println!(
        "updated premium to {}",
        store.get_by_id(policy.id)?.expect("still there").premium_amount
    );

    // Delete
    store.delete(policy.id)?;
    println!("deleted policy #{}, {} remain", policy.id, store.count(|_| true)?);

    Ok(())
}
