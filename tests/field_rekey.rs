//! Runs in its own binary: replaces the global config mid-process.

use std::sync::Barrier;

use extid_rs::{Codec, Config, Field, TypeMarker};

static OLD_KEY: [u8; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];
static NEW_KEY: [u8; 16] = [1; 16];

#[derive(Clone, Copy, Debug)]
struct UserMarker;
impl TypeMarker for UserMarker {
    fn name() -> &'static str {
        "user"
    }
}

type UserId = Field<UserMarker>;

#[test]
fn test_set_global_replaces_cached_codecs() {
    let old_encoded = "user_13189a6ae4ab07ae70a3aabd30be99de";
    let new_encoded = Codec::new("user", &NEW_KEY).unwrap().encode(1);
    assert_ne!(old_encoded, new_encoded);

    Config::set_global(Config::new(&OLD_KEY).unwrap());
    let barrier = Barrier::new(2);

    std::thread::scope(|s| {
        let worker = s.spawn(|| {
            // Caches the codec for "user" on this thread under the old key.
            assert_eq!(UserId::new(1).encode().unwrap(), old_encoded);
            barrier.wait();
            barrier.wait();
            assert_eq!(UserId::new(1).encode().unwrap(), new_encoded);
            assert_eq!(UserId::decode(&new_encoded).unwrap().id(), 1);
        });

        assert_eq!(UserId::new(1).encode().unwrap(), old_encoded);
        barrier.wait();
        Config::set_global(Config::new(&NEW_KEY).unwrap());
        barrier.wait();

        assert_eq!(UserId::new(1).encode().unwrap(), new_encoded);
        assert!(UserId::decode(old_encoded).unwrap().id() != 1);
        worker.join().unwrap();
    });
}
