use soroban_sdk::{ token::{ StellarAssetClient, TokenClient }, Address, Env };

/// Moves `amount` of `token` from `from` into the ledger's custody.
pub fn receive(env: &Env, token: &Address, from: &Address, amount: i128) {
    if amount > 0 {
        TokenClient::new(env, token).transfer(from, &env.current_contract_address(), &amount);
    }
}

/// Pays `amount` of `token` out of the ledger's custody.
pub fn send(env: &Env, token: &Address, to: &Address, amount: i128) {
    if amount > 0 {
        TokenClient::new(env, token).transfer(&env.current_contract_address(), to, &amount);
    }
}

/// Mints `amount` of a token administered by the ledger.
pub fn mint(env: &Env, token: &Address, to: &Address, amount: i128) {
    if amount > 0 {
        StellarAssetClient::new(env, token).mint(to, &amount);
    }
}

/// Burns `amount` of `token` held by the ledger.
pub fn burn(env: &Env, token: &Address, amount: i128) {
    if amount > 0 {
        TokenClient::new(env, token).burn(&env.current_contract_address(), &amount);
    }
}

pub fn balance(env: &Env, token: &Address) -> i128 {
    TokenClient::new(env, token).balance(&env.current_contract_address())
}
