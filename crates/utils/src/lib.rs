use rand::Rng;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                            abcdefghijklmnopqrstuvwxyz\
                            0123456789";

const UPPERCASE_BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

fn random_from_charset(charset: &[u8], len: usize) -> String {
    let mut rng = rand::thread_rng();

    (0..len)
        .map(|_| {
            let idx = rng.gen_range(0..charset.len());
            charset[idx] as char
        })
        .collect()
}

pub fn create_random_secret(secret_len: usize) -> String {
    random_from_charset(CHARSET, secret_len)
}

/// Random uppercase base-36 characters, e.g. `4KZ0`
pub fn create_random_base36(len: usize) -> String {
    random_from_charset(UPPERCASE_BASE36, len)
}
