//! TRC20 token contract bindings.

use alloy_sol_types::sol;

sol! {
    /// TRC20 token interface (ERC20-compatible ABI)
    interface ITRC20 {
        /// Emitted when an allowance is set
        event Approval(
            address indexed owner,
            address indexed spender,
            uint256 value
        );

        /// Get allowance granted by owner to spender
        function allowance(address owner, address spender) external view returns (uint256 remaining);

        /// Approve spender to spend tokens
        function approve(address spender, uint256 value) external returns (bool);

        /// Get token balance of an account
        function balanceOf(address who) external view returns (uint256);
    }
}
