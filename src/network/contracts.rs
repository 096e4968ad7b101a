//! Router ABI bindings and token metadata selectors

use alloy::{
    primitives::{keccak256, Address, Bytes, U256},
    sol,
    sol_types::SolCall,
};

sol! {
    #[allow(missing_docs)]
    interface IUniswapV2Router02 {
        function getAmountsOut(uint256 amountIn, address[] calldata path) external view returns (uint256[] memory amounts);
        function swapExactETHForTokens(uint256 amountOutMin, address[] calldata path, address to, uint256 deadline) external payable returns (uint256[] memory amounts);
    }
}

pub fn selector(signature: &str) -> Bytes {
    keccak256(signature)[..4].to_vec().into()
}

pub fn encode_get_amounts_out(amount_in: U256, path: &[Address]) -> Bytes {
    IUniswapV2Router02::getAmountsOutCall {
        amountIn: amount_in,
        path: path.to_vec(),
    }
    .abi_encode()
    .into()
}

pub fn decode_get_amounts_out(data: &[u8]) -> alloy::sol_types::Result<Vec<U256>> {
    IUniswapV2Router02::getAmountsOutCall::abi_decode_returns(data, true).map(|r| r.amounts)
}

pub fn encode_swap_exact_eth_for_tokens(
    amount_out_min: U256,
    path: &[Address],
    to: Address,
    deadline: U256,
) -> Bytes {
    IUniswapV2Router02::swapExactETHForTokensCall {
        amountOutMin: amount_out_min,
        path: path.to_vec(),
        to,
        deadline,
    }
    .abi_encode()
    .into()
}
