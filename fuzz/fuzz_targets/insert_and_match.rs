#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (Vec<(String, i32)>, String)| {
    let mut router = handoff::Router::new();

    for (path, handler) in data.0 {
        if router
            .insert(handoff::Route::new(path).handler(handler))
            .is_err()
        {
            return;
        }
    }

    let _ = router.at(&data.1);
});
