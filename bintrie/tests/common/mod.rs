use bintrie::{Blake3Hasher, KeyPath, Options, Strategy, Trie, Value};

pub fn key_path(id: u64) -> KeyPath {
    // KeyPaths must be uniformly distributed, but we don't want to spend time on a good hash. So
    // the next best option is to use a PRNG seeded with the id.
    use rand::{RngCore as _, SeedableRng as _};
    let mut seed = [0; 16];
    seed[0..8].copy_from_slice(&id.to_le_bytes());
    let mut rng = rand_pcg::Lcg64Xsh32::from_seed(seed);
    let mut path = KeyPath::default();
    for i in 0..8 {
        path[i * 4..][..4].copy_from_slice(&rng.next_u32().to_le_bytes());
    }
    path
}

pub fn value(id: u64) -> Value {
    *blake3::hash(&id.to_le_bytes()).as_bytes()
}

/// A key with only its last byte set.
#[allow(dead_code)]
pub fn small_key(last: u8) -> KeyPath {
    let mut key = [0u8; 32];
    key[31] = last;
    key
}

pub fn trie(strategy: Strategy) -> Trie<Blake3Hasher> {
    init_logging();
    let mut options = Options::new();
    options.strategy(strategy);
    options.metrics(true);
    Trie::new(options)
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
